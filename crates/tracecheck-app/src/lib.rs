//! Use case orchestration for tracecheck.
//!
//! This crate provides the application layer: use cases that coordinate the settings and domain
//! layers, load rule files, apply fixes to source files and render reports. It is intentionally
//! thin and delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod check;
mod explain;
mod fix;
mod input;
mod render;
mod report;
mod rules;

pub use check::{CheckInput, CheckOutput, run_check, verdict_exit_code};
pub use explain::{CodeEntry, ExplainOutput, format_explain, run_explain};
pub use fix::{FixOutcome, apply_fixes, fix_source};
pub use input::{InputBundle, parse_input_json};
pub use render::{render_github_annotations, render_markdown, render_text};
pub use report::{LineIndex, parse_report_json, runtime_error_report, serialize_report};
pub use rules::load_registry;
