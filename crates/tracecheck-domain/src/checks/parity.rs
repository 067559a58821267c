use super::utils::diagnostic;
use crate::classify::CallSite;
use crate::model::Expr;
use tracecheck_types::{Diagnostic, ids};

pub const MESSAGE: &str = "odd number of arguments passed as key-value pairs for logging";

pub fn run(site: &CallSite<'_>, key_values: &[&Expr], out: &mut Vec<Diagnostic>) {
    if key_values.len() % 2 == 0 {
        return;
    }
    let (Some(first), Some(last)) = (key_values.first(), key_values.last()) else {
        return;
    };
    out.push(diagnostic(
        site,
        ids::CODE_ODD_KEY_VALUES,
        MESSAGE.to_string(),
        first.span.start,
        Some(last.span.end),
    ));
}
