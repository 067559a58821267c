//! Render use cases: terminal text, Markdown and GitHub annotations from in-memory reports.

use tracecheck_types::{Diagnostic, TracecheckReport, Verdict};

fn position(d: &Diagnostic) -> String {
    let loc = &d.location;
    match (loc.line, loc.col) {
        (Some(line), Some(col)) => format!("{}:{line}:{col}", loc.path),
        (Some(line), None) => format!("{}:{line}", loc.path),
        _ => format!("{}:@{}", loc.path, loc.start),
    }
}

/// `path:line:col: message (category/code)`, one per diagnostic, then a summary line.
pub fn render_text(report: &TracecheckReport) -> String {
    let mut out = String::new();
    for d in &report.diagnostics {
        out.push_str(&format!(
            "{}: {} ({}/{})\n",
            position(d),
            d.message,
            d.category,
            d.code
        ));
        if let Some(fix) = &d.suggested_fix {
            out.push_str(&format!("  fix: {}\n", fix.description));
        }
    }
    out.push_str(&format!(
        "tracecheck: {} diagnostic(s), {} fixable, {} file(s) scanned\n",
        report.data.diagnostics_total, report.data.fixes_available, report.data.files_scanned
    ));
    out
}

/// Render diagnostics as GitHub Actions workflow command annotations.
///
/// Format:
/// `::error file={path},line={line},col={col}::{message}`
pub fn render_github_annotations(report: &TracecheckReport, max: usize) -> Vec<String> {
    let mut out = Vec::new();

    for d in report.diagnostics.iter().take(max) {
        let mut meta = format!("file={}", d.location.path);
        if let Some(line) = d.location.line {
            meta.push_str(&format!(",line={line}"));
        }
        if let Some(col) = d.location.col {
            meta.push_str(&format!(",col={col}"));
        }

        let message = format!("[{}:{}] {}", d.category, d.code, d.message)
            .replace('%', "%25")
            .replace('\r', "%0D")
            .replace('\n', "%0A");

        out.push(format!("::error {meta}::{message}"));
    }

    out
}

pub fn render_markdown(report: &TracecheckReport) -> String {
    let mut out = String::new();

    out.push_str("# Tracecheck report\n\n");
    let verdict = match report.verdict {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Diagnostics: {} ({} with suggested fix)\n- Files scanned: {}\n\n",
        verdict,
        report.data.diagnostics_total,
        report.data.fixes_available,
        report.data.files_scanned
    ));

    if report.diagnostics.is_empty() {
        out.push_str("No diagnostics.\n");
        return out;
    }

    out.push_str("## Diagnostics\n\n");

    for d in &report.diagnostics {
        out.push_str(&format!(
            "- `{}` / `{}`: {} (`{}`)\n",
            d.category,
            d.code,
            d.message,
            position(d)
        ));
        if let Some(fix) = &d.suggested_fix {
            out.push_str(&format!("  - fix: {}\n", fix.description));
        }
    }

    out
}
