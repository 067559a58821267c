use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const CONFIG_SCHEMA_V1: &str = "tracecheck.config.v1";

/// `tracecheck.toml` schema v1.
///
/// Unset fields fall back to the selected profile.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TracecheckConfigV1 {
    /// Optional schema string for tooling (`tracecheck.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// `default` or `strict`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Policy names whose rules are skipped. Replaces the profile's list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disable: Option<Vec<String>>,

    /// Path of a rule file, relative to the working directory. Exclusive with `rules`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rulefile: Option<String>,

    /// Inline rule patterns, one function pattern per entry.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub require_string_key: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub no_printf_like: Option<bool>,

    /// Key that must carry the trace identifier (default `traceId`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_key: Option<String>,

    /// Key used for the span identifier in suggested fixes (default `spanId`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary_key: Option<String>,

    /// Names of functions that construct a fresh logger (default `["NewLogger"]`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logger_constructors: Option<Vec<String>>,
}
