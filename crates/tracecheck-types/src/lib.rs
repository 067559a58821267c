//! Stable DTOs and IDs used across the tracecheck workspace.
//!
//! This crate is intentionally boring:
//! - data types for emitted diagnostics, suggested fixes and the report envelope
//! - stable string IDs and codes
//! - canonical repo-relative path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod diagnostic;
pub mod explain;
pub mod ids;
pub mod path;

pub use diagnostic::{
    Diagnostic, Location, ReportEnvelope, SCHEMA_INPUT_V1, SCHEMA_REPORT_V1, SuggestedFix,
    TextEdit, ToolMeta, TracecheckData, TracecheckReport, Verdict,
};
pub use explain::{ExamplePair, Explanation, lookup_explanation};
pub use path::RepoPath;
