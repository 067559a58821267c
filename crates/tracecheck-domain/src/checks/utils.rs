use crate::classify::CallSite;
use crate::fingerprint::fingerprint_for_diagnostic;
use tracecheck_types::{Diagnostic, Location, ids};

/// Build a diagnostic located in the call site's own file.
pub fn diagnostic(
    site: &CallSite<'_>,
    code: &str,
    message: String,
    start: u32,
    end: Option<u32>,
) -> Diagnostic {
    let path = site.file.path.clone();
    let fingerprint = fingerprint_for_diagnostic(ids::CATEGORY_LOGGING, code, path.as_str(), start);
    Diagnostic {
        category: ids::CATEGORY_LOGGING.to_string(),
        code: code.to_string(),
        message,
        location: Location::new(path, start, end),
        suggested_fix: None,
        fingerprint: Some(fingerprint),
    }
}
