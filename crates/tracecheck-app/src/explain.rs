//! The `explain` use case: look up category/code documentation.
//!
//! Categories list the codes reported under them; codes name their category. Identifiers match
//! case-insensitively and accept `-` for `_` (`missing-trace-id`).

use std::fmt::Write;
use tracecheck_types::explain::{self, Explanation};

/// A code reported under a category, with its title.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeEntry {
    pub code: &'static str,
    pub title: &'static str,
}

/// Output from the explain use case.
#[derive(Clone, Debug)]
pub enum ExplainOutput {
    Category {
        id: &'static str,
        explanation: Explanation,
        codes: Vec<CodeEntry>,
    },
    Code {
        id: &'static str,
        category: &'static str,
        explanation: Explanation,
    },
    /// Unknown identifier, with known identifiers sharing a word with it.
    NotFound {
        identifier: String,
        suggestions: Vec<&'static str>,
    },
}

impl ExplainOutput {
    pub fn is_found(&self) -> bool {
        !matches!(self, ExplainOutput::NotFound { .. })
    }
}

fn normalize(identifier: &str) -> String {
    identifier.trim().to_ascii_lowercase().replace('-', "_")
}

/// Look up an explanation for a category or code.
pub fn run_explain(identifier: &str) -> ExplainOutput {
    let wanted = normalize(identifier);

    if let Some(&id) = explain::all_categories().iter().find(|c| **c == wanted)
        && let Some(explanation) = explain::lookup_explanation(id)
    {
        let codes = explain::codes_in_category(id)
            .iter()
            .filter_map(|&code| {
                explain::lookup_explanation(code).map(|e| CodeEntry {
                    code,
                    title: e.title,
                })
            })
            .collect();
        return ExplainOutput::Category {
            id,
            explanation,
            codes,
        };
    }

    if let Some(&id) = explain::all_codes().iter().find(|c| **c == wanted)
        && let Some(explanation) = explain::lookup_explanation(id)
        && let Some(category) = explain::category_of(id)
    {
        return ExplainOutput::Code {
            id,
            category,
            explanation,
        };
    }

    ExplainOutput::NotFound {
        identifier: identifier.to_string(),
        suggestions: suggestions(&wanted),
    }
}

/// Known identifiers with a word (3+ chars) that starts, or is started by, a word of `wanted`.
fn suggestions(wanted: &str) -> Vec<&'static str> {
    let words: Vec<&str> = wanted.split('_').filter(|w| w.len() >= 3).collect();
    explain::all_categories()
        .iter()
        .chain(explain::all_codes())
        .copied()
        .filter(|id| {
            id.split('_').filter(|p| p.len() >= 3).any(|part| {
                words
                    .iter()
                    .any(|w| part.starts_with(w) || w.starts_with(part))
            })
        })
        .collect()
}

/// Format the explain output for terminal display.
pub fn format_explain(output: &ExplainOutput) -> String {
    let mut out = String::new();
    match output {
        ExplainOutput::Category {
            id,
            explanation,
            codes,
        } => {
            heading(&mut out, explanation.title);
            let _ = writeln!(out, "Category: {id}\n");
            let _ = writeln!(out, "{}\n", explanation.description);
            let width = codes.iter().map(|c| c.code.len()).max().unwrap_or(0);
            out.push_str("Codes\n-----\n");
            for entry in codes {
                let _ = writeln!(out, "  {:<width$}  {}", entry.code, entry.title);
            }
            out.push('\n');
            body(&mut out, explanation);
        }
        ExplainOutput::Code {
            id,
            category,
            explanation,
        } => {
            heading(&mut out, explanation.title);
            let _ = writeln!(out, "Code: {category}/{id}\n");
            let _ = writeln!(out, "{}\n", explanation.description);
            body(&mut out, explanation);
        }
        ExplainOutput::NotFound {
            identifier,
            suggestions,
        } => {
            let _ = writeln!(out, "Unknown category or code: {identifier}\n");
            if !suggestions.is_empty() {
                out.push_str("Did you mean:\n");
                for s in suggestions {
                    let _ = writeln!(out, "  - {s}");
                }
                out.push('\n');
            }
            out.push_str("Known categories and codes:\n");
            for category in explain::all_categories() {
                let _ = writeln!(out, "  {category}");
                for code in explain::codes_in_category(category) {
                    let _ = writeln!(out, "    - {code}");
                }
            }
        }
    }
    out
}

fn heading(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}\n{}\n", "=".repeat(title.len()));
}

fn body(out: &mut String, explanation: &Explanation) {
    let _ = writeln!(out, "Remediation\n-----------\n{}\n", explanation.remediation);
    let _ = writeln!(
        out,
        "Examples\n--------\n\nBefore (violation):\n```go\n{}\n```\n\nAfter (fixed):\n```go\n{}\n```",
        explanation.examples.before, explanation.examples.after
    );
}
