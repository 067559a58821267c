//! Rule registry construction: built-in sets plus the configured external rules.

use anyhow::Context;
use camino::Utf8Path;
use tracecheck_domain::registry::{RuleRegistry, RuleRegistryBuilder};
use tracecheck_domain::rules::{parse_rule_text, parse_rules};
use tracecheck_settings::RuleSource;

/// Build the registry once, before any file is evaluated. A relative rule-file path is resolved
/// against `base_dir`.
pub fn load_registry(source: &RuleSource, base_dir: &Utf8Path) -> anyhow::Result<RuleRegistry> {
    let mut builder = RuleRegistryBuilder::with_builtin_rules();

    match source {
        RuleSource::None => {}
        RuleSource::File(path) => {
            let path = base_dir.join(path);
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to open rule file {path}"))?;
            let rules = parse_rule_text(&text)
                .with_context(|| format!("failed to parse rule file {path}"))?;
            tracing::debug!(%path, rules = rules.len(), "loaded rule file");
            builder.extend(rules);
        }
        RuleSource::Inline(lines) => {
            let rules = parse_rules(lines).context("failed to parse inline rules")?;
            builder.extend(rules);
        }
    }

    Ok(builder.build_index())
}
