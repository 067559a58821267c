use crate::checks;
use crate::classify::{CallSite, classify};
use crate::model::SourceFile;
use crate::policy::{EffectiveConfig, PolicyTable};
use crate::registry::RuleRegistry;
use crate::report::{DomainReport, FileReport};
use crate::visit::{CallVisit, walk_calls};

/// Read-only evaluation context shared by every file of a run.
#[derive(Clone, Debug)]
pub struct Analyzer {
    registry: RuleRegistry,
    policies: PolicyTable,
    config: EffectiveConfig,
}

impl Analyzer {
    pub fn new(registry: RuleRegistry, policies: PolicyTable, config: EffectiveConfig) -> Self {
        Self {
            registry,
            policies,
            config,
        }
    }

    pub fn config(&self) -> &EffectiveConfig {
        &self.config
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Classify and validate every call of `file`.
    pub fn evaluate_file(&self, file: &SourceFile) -> FileReport {
        let mut report = FileReport::default();
        walk_calls(file, &mut |visit: CallVisit<'_>| {
            let Some(site) = CallSite::new(file, visit) else {
                return;
            };
            report.calls_scanned += 1;
            let Some(class) = classify(&site, &self.registry, &self.policies, &self.config)
            else {
                return;
            };
            report.calls_checked += 1;
            report
                .diagnostics
                .extend(checks::validate(&site, class.policy, &self.config));
        });
        report
    }
}

/// Sequential evaluation over a set of files.
pub fn evaluate(analyzer: &Analyzer, files: &[SourceFile]) -> DomainReport {
    DomainReport::from_file_reports(files.iter().map(|f| analyzer.evaluate_file(f)))
}
