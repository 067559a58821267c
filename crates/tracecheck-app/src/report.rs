use anyhow::{Context, bail};
use time::OffsetDateTime;
use tracecheck_types::{
    Diagnostic, Location, RepoPath, ReportEnvelope, SCHEMA_REPORT_V1, ToolMeta, TracecheckData,
    TracecheckReport, Verdict, ids,
};

pub fn parse_report_json(text: &str) -> anyhow::Result<TracecheckReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        bail!("unknown report schema: {schema}");
    }

    serde_json::from_value(value).context("parse tracecheck v1 report")
}

pub fn serialize_report(report: &TracecheckReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// A failing report describing a tool error, written in place of a normal report.
pub fn runtime_error_report(message: &str) -> TracecheckReport {
    let now = OffsetDateTime::now_utc();
    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "tracecheck".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        diagnostics: vec![Diagnostic {
            category: ids::CATEGORY_TOOL_RUNTIME.to_string(),
            code: ids::CODE_RUNTIME_ERROR.to_string(),
            message: message.to_string(),
            location: Location::new(RepoPath::default(), 0, None),
            suggested_fix: None,
            fingerprint: None,
        }],
        data: TracecheckData {
            diagnostics_total: 1,
            ..TracecheckData::default()
        },
    }
}

/// Byte offset -> 1-based (line, column) lookup. Columns count bytes, as Go positions do.
#[derive(Clone, Debug)]
pub struct LineIndex {
    line_starts: Vec<u32>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(
            text.bytes()
                .enumerate()
                .filter(|(_, b)| *b == b'\n')
                .map(|(i, _)| i as u32 + 1),
        );
        Self { line_starts }
    }

    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= offset);
        let start = self.line_starts[line.saturating_sub(1)];
        (line as u32, offset - start + 1)
    }
}
