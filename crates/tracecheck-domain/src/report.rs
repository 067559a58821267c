use tracecheck_types::{Diagnostic, TracecheckData, Verdict};

/// Result of evaluating one file.
#[derive(Clone, Debug, Default)]
pub struct FileReport {
    pub diagnostics: Vec<Diagnostic>,
    pub calls_scanned: u32,
    pub calls_checked: u32,
}

#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: Verdict,
    pub diagnostics: Vec<Diagnostic>,
    pub data: TracecheckData,
}

impl DomainReport {
    /// Merge per-file results. Diagnostics are sorted so the outcome does not depend on the order
    /// files were evaluated in.
    pub fn from_file_reports(files: impl IntoIterator<Item = FileReport>) -> Self {
        let mut data = TracecheckData::default();
        let mut diagnostics = Vec::new();
        for file in files {
            data.files_scanned += 1;
            data.calls_scanned += file.calls_scanned;
            data.calls_checked += file.calls_checked;
            diagnostics.extend(file.diagnostics);
        }

        diagnostics.sort_by(compare_diagnostics);
        data.diagnostics_total = diagnostics.len() as u32;
        data.fixes_available = diagnostics
            .iter()
            .filter(|d| d.suggested_fix.is_some())
            .count() as u32;

        let verdict = if diagnostics.is_empty() {
            Verdict::Pass
        } else {
            Verdict::Fail
        };

        Self {
            verdict,
            diagnostics,
            data,
        }
    }
}

fn compare_diagnostics(a: &Diagnostic, b: &Diagnostic) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) location.path
    // 2) location.start
    // 3) code
    // 4) message
    a.location
        .path
        .as_str()
        .cmp(b.location.path.as_str())
        .then(a.location.start.cmp(&b.location.start))
        .then(a.code.cmp(&b.code))
        .then(a.message.cmp(&b.message))
}
