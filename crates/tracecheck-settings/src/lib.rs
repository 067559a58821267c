//! Config parsing and profile/override resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.
//! Reading the rule file named by the config is left to the caller.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::{CONFIG_SCHEMA_V1, TracecheckConfigV1};
pub use presets::PROFILES;
pub use resolve::{Overrides, ResolvedConfig, RuleSource};

/// Parse `tracecheck.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<TracecheckConfigV1> {
    let cfg: TracecheckConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective engine config and rule source (profile + config file + CLI overrides).
pub fn resolve_config(
    cfg: TracecheckConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
