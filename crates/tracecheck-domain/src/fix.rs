//! Suggested fix for a missing correlation key.
//!
//! The fix declares a span handle at the top of the enclosing function, splices the correlation
//! and span key/value pairs into the call's arguments, and imports the tracing package when the
//! file does not import it yet. Every offset comes from the unmodified tree.

use crate::classify::CallSite;
use crate::edits::{EditError, validate_edits};
use crate::model::{Block, Expr, SourceFile};
use crate::printer::{PrintError, print_expr};
use crate::policy::EffectiveConfig;
use crate::rules::vendorless_path;
use thiserror::Error;
use tracecheck_types::{SuggestedFix, TextEdit};

pub const TRACE_IMPORT_PATH: &str = "go.opentelemetry.io/otel/trace";
pub const SPAN_VAR: &str = "span";

#[derive(Debug, Error)]
pub enum SynthesisError {
    #[error("call is not inside a function body")]
    NoEnclosingFunction,
    #[error("callee signature is unavailable")]
    NoSignature,
    #[error(transparent)]
    Print(#[from] PrintError),
    #[error("synthesized edits are malformed: {0}")]
    Edits(#[from] EditError),
}

/// How the trace package is referred to in one file.
#[derive(Clone, Debug, PartialEq, Eq)]
struct TraceImport {
    /// `None` for a dot import.
    qualifier: Option<String>,
    present: bool,
}

impl TraceImport {
    fn for_file(file: &SourceFile) -> Self {
        let spec = file
            .import_specs()
            .find(|s| vendorless_path(&s.path) == TRACE_IMPORT_PATH);
        let Some(spec) = spec else {
            return Self {
                qualifier: Some("trace".to_string()),
                present: false,
            };
        };
        let qualifier = match spec.name.as_deref() {
            Some(".") => None,
            Some(name) if name != "_" => Some(name.to_string()),
            _ => Some("trace".to_string()),
        };
        Self {
            qualifier,
            present: true,
        }
    }

    fn qualify(&self, ident: &str) -> String {
        match &self.qualifier {
            Some(q) => format!("{q}.{ident}"),
            None => ident.to_string(),
        }
    }
}

/// `Add traceId and spanId to logging keys`, with the configured key names.
pub fn fix_description(cfg: &EffectiveConfig) -> String {
    format!(
        "Add {} and {} to logging keys",
        cfg.correlation_key, cfg.secondary_key
    )
}

/// Build the fix for `site`. `key_values` are the policy-filtered variadic arguments.
/// Edits are returned sorted and disjoint.
pub fn synthesize(
    site: &CallSite<'_>,
    key_values: &[&Expr],
    cfg: &EffectiveConfig,
) -> Result<SuggestedFix, SynthesisError> {
    let body = site
        .enclosing_body
        .ok_or(SynthesisError::NoEnclosingFunction)?;
    let sig = site.signature().ok_or(SynthesisError::NoSignature)?;
    let trace = TraceImport::for_file(site.file);

    let mut edits = Vec::with_capacity(3);

    if let Some(edit) = import_edit(site.file, &trace) {
        edits.push(edit);
    }
    if let Some(edit) = declaration_edit(body, site.expr.span.start, &trace) {
        edits.push(edit);
    }
    edits.push(arguments_edit(
        site,
        sig.params.len().saturating_sub(1),
        key_values,
        cfg,
    )?);

    edits.sort_by(|a, b| (a.start, a.end).cmp(&(b.start, b.end)));
    validate_edits(&edits)?;

    Ok(SuggestedFix {
        description: fix_description(cfg),
        edits,
    })
}

/// `span := trace.SpanFromContext(ctx)` before the first statement, or at the closing brace of an
/// empty body. Skipped when a top-level statement ending before the call already declares `span`.
fn declaration_edit(body: &Block, call_start: u32, trace: &TraceImport) -> Option<TextEdit> {
    if body.declares_before(SPAN_VAR, call_start) {
        return None;
    }
    let decl = format!("{SPAN_VAR} := {}(ctx)", trace.qualify("SpanFromContext"));
    Some(match body.stmts.first() {
        Some(first) => TextEdit::insert(first.span.start, format!("{decl}\n\t")),
        None => TextEdit::insert(body.rbrace, format!("\t{decl}\n")),
    })
}

fn arguments_edit(
    site: &CallSite<'_>,
    fixed_params: usize,
    key_values: &[&Expr],
    cfg: &EffectiveConfig,
) -> Result<TextEdit, SynthesisError> {
    let args = &site.call.args;
    let existing = args
        .iter()
        .map(print_expr)
        .collect::<Result<Vec<_>, _>>()?;

    let context = format!("{SPAN_VAR}.SpanContext()");
    let added = [
        format!("{:?}", cfg.correlation_key),
        format!("{context}.TraceID().String()"),
        format!("{:?}", cfg.secondary_key),
        format!("{context}.SpanID().String()"),
    ];
    let index = insertion_index(args, fixed_params, key_values);
    let text = splice_arguments(&existing, index, &added).join(", ");

    Ok(match (args.first(), args.last()) {
        (Some(first), Some(last)) => TextEdit::replace(first.span.start, last.span.end, text),
        _ => TextEdit::insert(site.call.lparen + 1, text),
    })
}

/// New pairs go right after the first complete key/value pair, so the leading pair (usually the
/// event identity) stays first. Pairs are counted over the filtered `key_values`; arguments the
/// policy skips (`zapcore.Field`, `slog.Attr`) never split a pair. Without a complete pair the new
/// pairs open the variadic tail.
pub fn insertion_index(args: &[Expr], fixed_params: usize, key_values: &[&Expr]) -> usize {
    key_values
        .get(1)
        .and_then(|value| args.iter().position(|a| a.span == value.span))
        .map(|position| position + 1)
        .unwrap_or(fixed_params)
        .min(args.len())
}

/// Pure splice: `existing[..index] ++ inserted ++ existing[index..]`.
pub fn splice_arguments<S: AsRef<str>>(existing: &[String], index: usize, inserted: &[S]) -> Vec<String> {
    let index = index.min(existing.len());
    let mut out = Vec::with_capacity(existing.len() + inserted.len());
    out.extend_from_slice(&existing[..index]);
    out.extend(inserted.iter().map(|s| s.as_ref().to_string()));
    out.extend_from_slice(&existing[index..]);
    out
}

/// Import edit, unless the file already imports the trace package in any form.
fn import_edit(file: &SourceFile, trace: &TraceImport) -> Option<TextEdit> {
    if trace.present {
        return None;
    }
    let quoted = format!("\"{TRACE_IMPORT_PATH}\"");
    let Some(first) = file.imports.first() else {
        return Some(TextEdit::insert(
            file.package.span.end,
            format!("\n\nimport {quoted}"),
        ));
    };
    Some(match (first.lparen, first.specs.first()) {
        (Some(_), Some(spec)) => TextEdit::insert(spec.span.start, format!("{quoted}\n\t")),
        (Some(lparen), None) => TextEdit::insert(lparen + 1, format!("\n\t{quoted}\n")),
        (None, _) => TextEdit::insert(first.span.start, format!("import {quoted}\n")),
    })
}
