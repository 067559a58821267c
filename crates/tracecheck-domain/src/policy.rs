use crate::checks;
use crate::classify::CallSite;
use crate::model::Expr;
use std::collections::{BTreeMap, BTreeSet};
use tracecheck_types::Diagnostic;

/// Validation behavior selected by the policy name of the matching rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Policy {
    /// Every variadic argument takes part in key/value pairing.
    General,
    /// `zapcore.Field` arguments are self-describing and skipped.
    Zap,
    /// `slog.Attr` arguments are self-describing and skipped.
    Slog,
}

impl Policy {
    /// Drop the arguments that are not part of key/value pairing.
    pub fn filter_key_values<'a>(&self, args: &'a [Expr]) -> Vec<&'a Expr> {
        let skip: Option<(&str, &str)> = match self {
            Policy::General => None,
            Policy::Zap => Some(("go.uber.org/zap/zapcore", "Field")),
            Policy::Slog => Some(("log/slog", "Attr")),
        };
        args.iter()
            .filter(|arg| match (skip, arg.ty.as_ref()) {
                (Some((package, name)), Some(ty)) => !ty.is_named(package, name),
                _ => true,
            })
            .collect()
    }

    /// Key checks over the filtered key/value arguments. Shared by every policy.
    pub fn check_keys(&self, site: &CallSite<'_>, key_values: &[&Expr]) -> Vec<Diagnostic> {
        match self {
            Policy::General | Policy::Zap | Policy::Slog => checks::check_keys(site, key_values),
        }
    }

    /// Printf-specifier check over the complete argument list.
    pub fn check_printf(&self, site: &CallSite<'_>, args: &[Expr]) -> Vec<Diagnostic> {
        match self {
            Policy::General | Policy::Zap | Policy::Slog => checks::check_printf(site, args),
        }
    }
}

/// Explicit name -> policy registrations. Unknown names fall back to [`Policy::General`].
#[derive(Clone, Debug)]
pub struct PolicyTable {
    by_name: BTreeMap<String, Policy>,
}

impl Default for PolicyTable {
    fn default() -> Self {
        let mut table = Self {
            by_name: BTreeMap::new(),
        };
        table.register("zap", Policy::Zap);
        table.register("slog", Policy::Slog);
        table
    }
}

impl PolicyTable {
    pub fn register(&mut self, name: impl Into<String>, policy: Policy) {
        self.by_name.insert(name.into(), policy);
    }

    pub fn resolve(&self, name: &str) -> Policy {
        self.by_name.get(name).copied().unwrap_or(Policy::General)
    }
}

/// Engine configuration after defaults, config file and CLI overrides are merged.
#[derive(Clone, Debug)]
pub struct EffectiveConfig {
    pub profile: String,
    /// Policy names whose rules are skipped.
    pub disabled: BTreeSet<String>,
    pub require_string_key: bool,
    pub no_printf_like: bool,
    /// Key that carries the trace identifier.
    pub correlation_key: String,
    /// Key that carries the span identifier in synthesized fixes.
    pub secondary_key: String,
    /// Function names that construct a fresh logger (`zapr.NewLogger`).
    pub logger_constructors: Vec<String>,
    /// Method-name suffix of field-accumulating calls.
    pub accumulator_suffix: String,
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self {
            profile: "default".to_string(),
            disabled: BTreeSet::from(["kitlog".to_string()]),
            require_string_key: false,
            no_printf_like: false,
            correlation_key: "traceId".to_string(),
            secondary_key: "spanId".to_string(),
            logger_constructors: vec!["NewLogger".to_string()],
            accumulator_suffix: "WithValues".to_string(),
        }
    }
}

impl EffectiveConfig {
    pub fn is_disabled(&self, policy_name: &str) -> bool {
        self.disabled.contains(policy_name)
    }

    pub fn is_logger_constructor(&self, func_name: &str) -> bool {
        self.logger_constructors.iter().any(|c| c == func_name)
    }
}
