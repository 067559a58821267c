use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a diagnostic.
///
/// Identity fields:
/// - category
/// - code
/// - file path (repo-relative)
/// - start offset
pub fn fingerprint_for_diagnostic(category: &str, code: &str, path: &str, start: u32) -> String {
    let start = start.to_string();
    let canonical = [category, code, path, start.as_str()].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
