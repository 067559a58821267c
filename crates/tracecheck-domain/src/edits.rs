//! Edit-script validation and application.

use std::collections::BTreeSet;
use thiserror::Error;
use tracecheck_types::{SuggestedFix, TextEdit};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("edit {index} has an inverted range {start}..{end}")]
    InvertedRange { index: usize, start: u32, end: u32 },
    #[error("edit {index} starts at {start}, before the previous edit")]
    Unsorted { index: usize, start: u32 },
    #[error("edit {index} overlaps the previous edit at offset {start}")]
    Overlap { index: usize, start: u32 },
    #[error("edit {index} ends at {end}, past the end of the text ({len} bytes)")]
    OutOfBounds { index: usize, end: u32, len: usize },
    #[error("edit {index} splits a character at offset {offset}")]
    NotCharBoundary { index: usize, offset: u32 },
}

/// Edits must be sorted by start, strictly increasing, with pairwise disjoint ranges.
pub fn validate_edits(edits: &[TextEdit]) -> Result<(), EditError> {
    for (index, edit) in edits.iter().enumerate() {
        if edit.start > edit.end {
            return Err(EditError::InvertedRange {
                index,
                start: edit.start,
                end: edit.end,
            });
        }
        let Some(prev) = index.checked_sub(1).map(|i| &edits[i]) else {
            continue;
        };
        if prev.start >= edit.start {
            return Err(EditError::Unsorted {
                index,
                start: edit.start,
            });
        }
        if prev.end > edit.start {
            return Err(EditError::Overlap {
                index,
                start: edit.start,
            });
        }
    }
    Ok(())
}

/// Apply a validated edit script to `source` in one pass.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    validate_edits(edits)?;

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0usize;
    for (index, edit) in edits.iter().enumerate() {
        let start = edit.start as usize;
        let end = edit.end as usize;
        if end > source.len() {
            return Err(EditError::OutOfBounds {
                index,
                end: edit.end,
                len: source.len(),
            });
        }
        for offset in [edit.start, edit.end] {
            if !source.is_char_boundary(offset as usize) {
                return Err(EditError::NotCharBoundary { index, offset });
            }
        }
        out.push_str(&source[cursor..start]);
        out.push_str(&edit.new_text);
        cursor = end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

/// Merges the fixes of one file into a single edit script.
///
/// Fixes are all-or-nothing: an identical edit already taken is shared (two calls in one
/// function both insert the same declaration), any other conflict skips the whole fix.
#[derive(Clone, Debug, Default)]
pub struct EditBatch {
    edits: Vec<TextEdit>,
    seen: BTreeSet<(u32, u32, String)>,
    applied: usize,
    skipped: usize,
}

impl EditBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the fix was taken.
    pub fn add(&mut self, fix: &SuggestedFix) -> bool {
        let fresh: Vec<&TextEdit> = fix
            .edits
            .iter()
            .filter(|e| !self.seen.contains(&key(e)))
            .collect();

        let mut candidate: Vec<TextEdit> = self.edits.clone();
        candidate.extend(fresh.iter().map(|e| (*e).clone()));
        candidate.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
        if validate_edits(&candidate).is_err() {
            self.skipped += 1;
            return false;
        }

        for e in fresh {
            self.seen.insert(key(e));
        }
        self.edits = candidate;
        self.applied += 1;
        true
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_edits(self) -> Vec<TextEdit> {
        self.edits
    }
}

fn key(e: &TextEdit) -> (u32, u32, String) {
    (e.start, e.end, e.new_text.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix(edits: Vec<TextEdit>) -> SuggestedFix {
        SuggestedFix {
            description: "test".to_string(),
            edits,
        }
    }

    #[test]
    fn apply_splices_in_order() {
        let edits = vec![
            TextEdit::insert(0, ">"),
            TextEdit::replace(2, 5, "XY"),
            TextEdit::insert(7, "!"),
        ];
        assert_eq!(apply_edits("abcdefg", &edits).unwrap(), ">abXYfg!");
    }

    #[test]
    fn overlapping_and_unsorted_edits_are_rejected() {
        let overlap = vec![TextEdit::replace(0, 4, "a"), TextEdit::replace(3, 5, "b")];
        assert_eq!(
            validate_edits(&overlap),
            Err(EditError::Overlap { index: 1, start: 3 })
        );

        let unsorted = vec![TextEdit::insert(4, "a"), TextEdit::insert(1, "b")];
        assert_eq!(
            validate_edits(&unsorted),
            Err(EditError::Unsorted { index: 1, start: 1 })
        );

        let same_point = vec![TextEdit::insert(2, "a"), TextEdit::insert(2, "b")];
        assert!(validate_edits(&same_point).is_err());
    }

    #[test]
    fn apply_rejects_out_of_bounds_and_split_characters() {
        assert!(matches!(
            apply_edits("abc", &[TextEdit::insert(9, "x")]),
            Err(EditError::OutOfBounds { .. })
        ));
        assert!(matches!(
            apply_edits("é", &[TextEdit::insert(1, "x")]),
            Err(EditError::NotCharBoundary { .. })
        ));
    }

    #[test]
    fn batch_shares_identical_edits_and_skips_conflicts() {
        let decl = TextEdit::insert(10, "span := x\n\t");
        let mut batch = EditBatch::new();
        assert!(batch.add(&fix(vec![decl.clone(), TextEdit::replace(20, 25, "a")])));
        assert!(batch.add(&fix(vec![decl.clone(), TextEdit::replace(30, 35, "b")])));
        assert!(!batch.add(&fix(vec![TextEdit::replace(22, 31, "c")])));

        assert_eq!(batch.applied(), 2);
        assert_eq!(batch.skipped(), 1);
        let edits = batch.into_edits();
        assert_eq!(edits.len(), 3);
        assert!(validate_edits(&edits).is_ok());
    }
}
