use super::utils::diagnostic;
use crate::classify::CallSite;
use crate::model::Expr;
use crate::printer::render_ellipsis;
use tracecheck_types::{Diagnostic, ids};

pub fn run(site: &CallSite<'_>, key_values: &[&Expr]) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for key in key_values.iter().step_by(2) {
        match key.constant_string() {
            None => out.push(diagnostic(
                site,
                ids::CODE_NON_CONSTANT_KEY,
                format!(
                    "logging keys are expected to be inlined constant strings, please replace {:?} provided with string",
                    render_ellipsis(key)
                ),
                key.span.start,
                Some(key.span.end),
            )),
            Some(value) if !value.is_ascii() => out.push(diagnostic(
                site,
                ids::CODE_NON_ASCII_KEY,
                format!(
                    "logging keys are expected to be alphanumeric strings, please remove any non-latin characters from {value:?}"
                ),
                key.span.start,
                Some(key.span.end),
            )),
            Some(_) => {}
        }
    }
    out
}
