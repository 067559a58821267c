//! The `fix` use case: apply suggested fixes to the source files on disk.

use anyhow::{Context, bail};
use camino::Utf8Path;
use std::collections::BTreeMap;
use std::io::Write;
use tracecheck_domain::edits::{EditBatch, apply_edits};
use tracecheck_domain::model::SourceFile;
use tracecheck_types::{Diagnostic, RepoPath, SuggestedFix};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FixOutcome {
    pub files_changed: Vec<RepoPath>,
    pub fixes_applied: usize,
    /// Fixes dropped because they conflicted with a fix already taken for the same file.
    pub fixes_skipped: usize,
}

/// Apply `fixes` to `text`. Each fix is taken whole or not at all.
pub fn fix_source<'a>(
    text: &str,
    fixes: impl IntoIterator<Item = &'a SuggestedFix>,
) -> anyhow::Result<(String, EditBatch)> {
    let mut batch = EditBatch::new();
    for fix in fixes {
        batch.add(fix);
    }
    let edits = batch.clone().into_edits();
    let fixed = apply_edits(text, &edits).context("apply edits")?;
    Ok((fixed, batch))
}

/// Rewrite every file under `root` that has fixable diagnostics.
///
/// When the model carries the file's source text, the file on disk must still match it;
/// offsets are meaningless otherwise.
pub fn apply_fixes(
    root: &Utf8Path,
    diagnostics: &[Diagnostic],
    files: &[SourceFile],
) -> anyhow::Result<FixOutcome> {
    let mut by_path: BTreeMap<&RepoPath, Vec<&SuggestedFix>> = BTreeMap::new();
    for d in diagnostics {
        if let Some(fix) = &d.suggested_fix {
            by_path.entry(&d.location.path).or_default().push(fix);
        }
    }

    let sources: BTreeMap<&RepoPath, &str> = files
        .iter()
        .filter_map(|f| f.source.as_deref().map(|s| (&f.path, s)))
        .collect();

    let mut outcome = FixOutcome::default();
    for (path, fixes) in by_path {
        let disk_path = path.under(root);
        let text = std::fs::read_to_string(&disk_path)
            .with_context(|| format!("read source: {disk_path}"))?;
        if let Some(expected) = sources.get(path)
            && *expected != text
        {
            bail!("{disk_path} changed since the input model was produced");
        }

        let (fixed, batch) =
            fix_source(&text, fixes).with_context(|| format!("fix {disk_path}"))?;
        if batch.skipped() > 0 {
            tracing::warn!(path = %path, skipped = batch.skipped(), "conflicting fixes skipped");
        }
        outcome.fixes_applied += batch.applied();
        outcome.fixes_skipped += batch.skipped();

        if fixed != text {
            write_atomic(&disk_path, &fixed)?;
            outcome.files_changed.push(path.clone());
        }
    }

    Ok(outcome)
}

/// Write through a temporary file in the same directory so readers never see a partial file.
fn write_atomic(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_str().is_empty() => p,
        _ => Utf8Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temporary file in {dir}"))?;
    tmp.write_all(text.as_bytes())
        .with_context(|| format!("write fixed source for {path}"))?;
    tmp.persist(path)
        .with_context(|| format!("replace {path}"))?;
    Ok(())
}
