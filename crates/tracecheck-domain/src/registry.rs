use crate::rules::{Rule, builtin_rules, vendorless_path};
use std::collections::HashMap;

/// Collects rules in registration order. Building the index freezes the set.
#[derive(Clone, Debug, Default)]
pub struct RuleRegistryBuilder {
    rules: Vec<Rule>,
}

impl RuleRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from the built-in rule sets.
    pub fn with_builtin_rules() -> Self {
        Self {
            rules: builtin_rules(),
        }
    }

    pub fn register(&mut self, rule: Rule) -> &mut Self {
        self.rules.push(rule);
        self
    }

    pub fn extend(&mut self, rules: impl IntoIterator<Item = Rule>) -> &mut Self {
        self.rules.extend(rules);
        self
    }

    pub fn build_index(self) -> RuleRegistry {
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, rule) in self.rules.iter().enumerate() {
            index
                .entry(vendorless_path(&rule.package_import).to_string())
                .or_default()
                .push(i);
        }
        RuleRegistry {
            rules: self.rules,
            index,
        }
    }
}

/// Read-only rule set with an import-path index.
///
/// Positions returned by [`RuleRegistry::lookup`] are in registration order, which is the
/// tie-break when several rules share a package.
#[derive(Clone, Debug)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
    index: HashMap<String, Vec<usize>>,
}

impl RuleRegistry {
    pub fn builtin() -> Self {
        RuleRegistryBuilder::with_builtin_rules().build_index()
    }

    pub fn lookup(&self, import_path: &str) -> &[usize] {
        self.index
            .get(vendorless_path(import_path))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn rule(&self, position: usize) -> &Rule {
        &self.rules[position]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
