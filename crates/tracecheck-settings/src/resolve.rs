use crate::model::{CONFIG_SCHEMA_V1, TracecheckConfigV1};
use crate::presets;
use anyhow::{Context, bail};
use tracecheck_domain::policy::EffectiveConfig;

/// Command-line overrides. Each set field replaces the config file's value.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub disable: Option<Vec<String>>,
    pub rulefile: Option<String>,
    pub rules: Vec<String>,
    pub require_string_key: Option<bool>,
    pub no_printf_like: Option<bool>,
}

/// Where external rules come from. A rule file wins over inline rules.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RuleSource {
    #[default]
    None,
    File(String),
    Inline(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
    pub rule_source: RuleSource,
}

pub fn resolve_config(
    cfg: TracecheckConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != CONFIG_SCHEMA_V1
    {
        bail!("unsupported config schema: {schema} (expected {CONFIG_SCHEMA_V1})");
    }

    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "default".to_string());

    let Some(mut effective) = presets::preset(&profile) else {
        bail!(
            "unknown profile: {profile} (expected one of {})",
            presets::PROFILES.join("|")
        );
    };

    if let Some(disable) = overrides.disable.clone().or(cfg.disable.clone()) {
        effective.disabled = disable
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(v) = overrides.require_string_key.or(cfg.require_string_key) {
        effective.require_string_key = v;
    }
    if let Some(v) = overrides.no_printf_like.or(cfg.no_printf_like) {
        effective.no_printf_like = v;
    }

    if let Some(key) = cfg.correlation_key.as_deref() {
        effective.correlation_key = non_empty("correlation_key", key)?;
    }
    if let Some(key) = cfg.secondary_key.as_deref() {
        effective.secondary_key = non_empty("secondary_key", key)?;
    }
    if let Some(ctors) = cfg.logger_constructors.clone() {
        effective.logger_constructors = ctors;
    }

    let config_source = rule_source(cfg.rulefile.clone(), cfg.rules.clone())
        .context("invalid rule configuration in config file")?;
    let cli_source = rule_source(overrides.rulefile.clone(), overrides.rules.clone())
        .context("invalid rule options")?;
    let rule_source = match cli_source {
        RuleSource::None => config_source,
        cli => cli,
    };

    Ok(ResolvedConfig {
        effective,
        rule_source,
    })
}

fn rule_source(rulefile: Option<String>, rules: Vec<String>) -> anyhow::Result<RuleSource> {
    match (rulefile, rules.is_empty()) {
        (Some(_), false) => bail!("`rulefile` and `rules` are mutually exclusive"),
        (Some(path), true) => Ok(RuleSource::File(path)),
        (None, false) => Ok(RuleSource::Inline(rules)),
        (None, true) => Ok(RuleSource::None),
    }
}

fn non_empty(field: &str, value: &str) -> anyhow::Result<String> {
    let value = value.trim();
    if value.is_empty() {
        bail!("{field} must not be empty");
    }
    Ok(value.to_string())
}
