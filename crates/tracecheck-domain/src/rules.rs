//! Rules bind a package import path and a set of function patterns to a policy name.
//!
//! Pattern syntax, one per line:
//!
//! ```text
//! # comment
//! k8s.io/klog/v2.InfoS
//! (github.com/go-logr/logr.Logger).WithValues
//! (*go.uber.org/zap.SugaredLogger).With
//! (example.com/log.Logger[T]).With
//! ```

use crate::model::{FuncSymbol, Type};
use std::collections::BTreeMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleParseError {
    #[error("invalid rule at line {line}: {rule:?}")]
    InvalidRule { line: usize, rule: String },
}

/// Strip everything up to and including the last `/vendor/` segment.
///
/// `a/vendor/github.com/go-logr/logr` becomes `github.com/go-logr/logr`.
pub fn vendorless_path(path: &str) -> &str {
    match path.rfind("/vendor/") {
        Some(i) => &path[i + "/vendor/".len()..],
        None => path,
    }
}

/// One function pattern. The package import lives on the owning [`Rule`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FuncPattern {
    /// `Logger`, `*SugaredLogger`, `Logger[T]`; empty for plain functions.
    pub receiver_type: String,
    pub func_name: String,
    pub is_receiver: bool,
}

impl FuncPattern {
    fn matches_receiver(&self, recv: Option<&Type>) -> bool {
        match (recv, self.is_receiver) {
            (None, false) => true,
            (Some(recv), true) => receiver_type_of(recv).as_deref() == Some(&self.receiver_type),
            _ => false,
        }
    }
}

/// Receiver shape as written in patterns: optional `*`, type name, type parameter names.
pub fn receiver_type_of(recv: &Type) -> Option<String> {
    let (pointer, named) = match recv {
        Type::Pointer { elem } => (true, elem.as_ref()),
        other => (false, other),
    };
    let Type::Named {
        name, type_params, ..
    } = named
    else {
        return None;
    };

    let mut out = String::new();
    if pointer {
        out.push('*');
    }
    out.push_str(name);
    if !type_params.is_empty() {
        out.push('[');
        out.push_str(&type_params.join(","));
        out.push(']');
    }
    Some(out)
}

/// Parse a single pattern into its package import and [`FuncPattern`].
pub fn parse_func_pattern(rule: &str) -> Option<(String, FuncPattern)> {
    let split = rule.rfind(['.', '/'])?;
    if rule.as_bytes()[split] == b'/' {
        return None;
    }
    let import_or_receiver = &rule[..split];
    let func_name = &rule[split + 1..];
    if func_name.is_empty() {
        return None;
    }

    if !rule.starts_with('(') {
        if import_or_receiver.is_empty() {
            return None;
        }
        let pattern = FuncPattern {
            receiver_type: String::new(),
            func_name: func_name.to_string(),
            is_receiver: false,
        };
        return Some((import_or_receiver.to_string(), pattern));
    }

    let receiver = import_or_receiver.strip_prefix('(')?.strip_suffix(')')?;
    let (pointer, receiver) = match receiver.strip_prefix('*') {
        Some(rest) => (true, rest),
        None => (false, receiver),
    };

    // Type parameters may contain dots of their own; split before them.
    let base_end = receiver.find('[').unwrap_or(receiver.len());
    let type_dot = receiver[..base_end].rfind(['.', '/'])?;
    if receiver.as_bytes()[type_dot] == b'/' {
        return None;
    }
    let package = &receiver[..type_dot];
    let type_name = &receiver[type_dot + 1..];
    if package.is_empty() || type_name.is_empty() {
        return None;
    }

    let receiver_type = if pointer {
        format!("*{type_name}")
    } else {
        type_name.to_string()
    };
    let pattern = FuncPattern {
        receiver_type,
        func_name: func_name.to_string(),
        is_receiver: true,
    };
    Some((package.to_string(), pattern))
}

/// An immutable rule: package import + patterns + policy name.
///
/// Identity is `(package_import, policy_name)`.
#[derive(Clone, Debug)]
pub struct Rule {
    pub policy_name: String,
    pub package_import: String,
    patterns: Vec<FuncPattern>,
    by_func_name: BTreeMap<String, Vec<usize>>,
}

impl Rule {
    pub fn new(
        policy_name: impl Into<String>,
        package_import: impl Into<String>,
        patterns: Vec<FuncPattern>,
    ) -> Self {
        let mut by_func_name: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for (i, p) in patterns.iter().enumerate() {
            by_func_name.entry(p.func_name.clone()).or_default().push(i);
        }
        Self {
            policy_name: policy_name.into(),
            package_import: package_import.into(),
            patterns,
            by_func_name,
        }
    }

    pub fn patterns(&self) -> &[FuncPattern] {
        &self.patterns
    }

    /// The package import was already matched through the registry index; only the function
    /// name and receiver shape are compared here.
    pub fn matches(&self, func: &FuncSymbol) -> bool {
        let Some(indices) = self.by_func_name.get(&func.name) else {
            return false;
        };
        indices
            .iter()
            .any(|&i| self.patterns[i].matches_receiver(func.signature.recv.as_ref()))
    }
}

/// Parse rule lines into rules, one per package import in first-appearance order.
///
/// Blank lines and `#` comments are skipped. Parsed rules carry an empty policy name and are
/// checked with the general policy.
pub fn parse_rules<S: AsRef<str>>(lines: &[S]) -> Result<Vec<Rule>, RuleParseError> {
    let mut order: Vec<String> = Vec::new();
    let mut grouped: BTreeMap<String, Vec<FuncPattern>> = BTreeMap::new();

    for (i, line) in lines.iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (package, pattern) =
            parse_func_pattern(line).ok_or_else(|| RuleParseError::InvalidRule {
                line: i + 1,
                rule: line.to_string(),
            })?;
        if !grouped.contains_key(&package) {
            order.push(package.clone());
        }
        grouped.entry(package).or_default().push(pattern);
    }

    Ok(order
        .into_iter()
        .map(|package| {
            let patterns = grouped.remove(&package).unwrap_or_default();
            Rule::new("", package, patterns)
        })
        .collect())
}

/// Parse the contents of a rule file.
pub fn parse_rule_text(text: &str) -> Result<Vec<Rule>, RuleParseError> {
    let lines: Vec<&str> = text.lines().collect();
    parse_rules(&lines)
}

fn builtin(name: &str, lines: &[&str]) -> Vec<Rule> {
    parse_rules(lines)
        .expect("built-in rule patterns are valid")
        .into_iter()
        .map(|r| Rule::new(name, r.package_import, r.patterns))
        .collect()
}

/// Built-in rules, in registration order.
pub fn builtin_rules() -> Vec<Rule> {
    let mut rules = Vec::new();
    rules.extend(builtin(
        "logr",
        &[
            "(github.com/go-logr/logr.Logger).Error",
            "(github.com/go-logr/logr.Logger).Info",
            "(github.com/go-logr/logr.Logger).WithValues",
        ],
    ));
    rules.extend(builtin(
        "klog",
        &[
            "k8s.io/klog/v2.InfoS",
            "k8s.io/klog/v2.InfoSDepth",
            "k8s.io/klog/v2.ErrorS",
            "(k8s.io/klog/v2.Verbose).InfoS",
            "(k8s.io/klog/v2.Verbose).InfoSDepth",
            "(k8s.io/klog/v2.Verbose).ErrorS",
        ],
    ));
    rules.extend(builtin(
        "zap",
        &[
            "(*go.uber.org/zap.SugaredLogger).With",
            "(*go.uber.org/zap.SugaredLogger).Debugw",
            "(*go.uber.org/zap.SugaredLogger).Infow",
            "(*go.uber.org/zap.SugaredLogger).Warnw",
            "(*go.uber.org/zap.SugaredLogger).Errorw",
            "(*go.uber.org/zap.SugaredLogger).DPanicw",
            "(*go.uber.org/zap.SugaredLogger).Panicw",
            "(*go.uber.org/zap.SugaredLogger).Fatalw",
        ],
    ));
    rules.extend(builtin(
        "kitlog",
        &[
            "github.com/go-kit/log.With",
            "github.com/go-kit/log.WithPrefix",
            "github.com/go-kit/log.WithSuffix",
            "(github.com/go-kit/log.Logger).Log",
        ],
    ));
    rules.extend(builtin(
        "slog",
        &[
            "log/slog.Group",
            "log/slog.With",
            "log/slog.Debug",
            "log/slog.Info",
            "log/slog.Warn",
            "log/slog.Error",
            "log/slog.DebugContext",
            "log/slog.InfoContext",
            "log/slog.WarnContext",
            "log/slog.ErrorContext",
            "log/slog.Log",
            "(*log/slog.Logger).With",
            "(*log/slog.Logger).Debug",
            "(*log/slog.Logger).Info",
            "(*log/slog.Logger).Warn",
            "(*log/slog.Logger).Error",
            "(*log/slog.Logger).DebugContext",
            "(*log/slog.Logger).InfoContext",
            "(*log/slog.Logger).WarnContext",
            "(*log/slog.Logger).ErrorContext",
            "(*log/slog.Logger).Log",
        ],
    ));
    rules
}
