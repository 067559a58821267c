use crate::RepoPath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifiers.
pub const SCHEMA_REPORT_V1: &str = "tracecheck.report.v1";
pub const SCHEMA_INPUT_V1: &str = "tracecheck.input.v1";

/// Where a diagnostic points. Offsets are byte offsets into the file's source text.
///
/// `end` is absent when the host should highlight the whole line containing `start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: RepoPath,
    pub start: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<u32>,
    /// 1-based line, filled in when the source text is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column (bytes), filled in when the source text is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col: Option<u32>,
}

impl Location {
    pub fn new(path: RepoPath, start: u32, end: Option<u32>) -> Self {
        Self {
            path,
            start,
            end,
            line: None,
            col: None,
        }
    }
}

/// Replace `start..end` (byte offsets into the original source) with `new_text`.
///
/// `start == end` is a pure insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TextEdit {
    pub start: u32,
    pub end: u32,
    pub new_text: String,
}

impl TextEdit {
    pub fn insert(at: u32, text: impl Into<String>) -> Self {
        Self {
            start: at,
            end: at,
            new_text: text.into(),
        }
    }

    pub fn replace(start: u32, end: u32, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: text.into(),
        }
    }
}

/// A named batch of edits that must be applied together or not at all.
///
/// Edits are pairwise disjoint and sorted by `start`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestedFix {
    pub description: String,
    pub edits: Vec<TextEdit>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Diagnostic {
    pub category: String,
    pub code: String,
    pub message: String,
    pub location: Location,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<SuggestedFix>,

    /// Stable identifier intended for dedup across runs:
    /// hash of `category + code + path + start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Summary counters for a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct TracecheckData {
    pub files_scanned: u32,
    pub calls_scanned: u32,
    /// Calls that matched a rule and went through validation.
    pub calls_checked: u32,
    pub diagnostics_total: u32,
    pub fixes_available: u32,
}

/// A generic report envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = TracecheckData> {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub diagnostics: Vec<Diagnostic>,
    pub data: TData,
}

pub type TracecheckReport = ReportEnvelope<TracecheckData>;
