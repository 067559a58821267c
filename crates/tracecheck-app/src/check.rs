//! The `check` use case: evaluate the input model and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracecheck_domain::Analyzer;
use tracecheck_domain::model::SourceFile;
use tracecheck_domain::policy::PolicyTable;
use tracecheck_domain::report::{DomainReport, FileReport};
use tracecheck_settings::{Overrides, ResolvedConfig};
use tracecheck_types::{RepoPath, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, TracecheckReport, Verdict};
use time::OffsetDateTime;

use crate::report::LineIndex;
use crate::rules::load_registry;

/// Input for the check use case.
#[derive(Clone, Debug)]
pub struct CheckInput<'a> {
    /// `tracecheck.input.v1` document.
    pub input_text: &'a str,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
    /// Directory relative rule-file paths are resolved against.
    pub base_dir: &'a Utf8Path,
}

/// Output from the check use case.
#[derive(Clone, Debug)]
pub struct CheckOutput {
    /// The generated report.
    pub report: TracecheckReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
    /// The evaluated files, needed to apply fixes afterwards.
    pub files: Vec<SourceFile>,
}

/// Run the check use case: parse config, build the rule registry, evaluate every file, produce
/// a report.
///
/// Configuration problems abort before any file is evaluated.
pub fn run_check(input: CheckInput<'_>) -> anyhow::Result<CheckOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        tracecheck_settings::TracecheckConfigV1::default()
    } else {
        tracecheck_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = tracecheck_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;

    let registry =
        load_registry(&resolved.rule_source, input.base_dir).context("load rules")?;

    let files = crate::input::parse_input_json(input.input_text)?;

    let analyzer = Analyzer::new(registry, PolicyTable::default(), resolved.effective.clone());
    let per_file: Vec<FileReport> = files
        .par_iter()
        .map(|file| analyzer.evaluate_file(file))
        .collect();

    let DomainReport {
        verdict,
        mut diagnostics,
        data,
    } = DomainReport::from_file_reports(per_file);

    fill_line_columns(&mut diagnostics, &files);

    tracing::info!(
        files = data.files_scanned,
        calls_checked = data.calls_checked,
        diagnostics = data.diagnostics_total,
        fixes = data.fixes_available,
        "check finished"
    );

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "tracecheck".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        diagnostics,
        data,
    };

    Ok(CheckOutput {
        report,
        resolved_config: resolved,
        files,
    })
}

/// Attach 1-based line/column positions for files that carry their source text.
fn fill_line_columns(diagnostics: &mut [tracecheck_types::Diagnostic], files: &[SourceFile]) {
    let indexes: BTreeMap<&RepoPath, LineIndex> = files
        .iter()
        .filter_map(|f| f.source.as_deref().map(|s| (&f.path, LineIndex::new(s))))
        .collect();

    for d in diagnostics {
        if let Some(index) = indexes.get(&d.location.path) {
            let (line, col) = index.line_col(d.location.start);
            d.location.line = Some(line);
            d.location.col = Some(col);
        }
    }
}

/// Map verdict to exit code: 0 = pass, 2 = diagnostics reported.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}
