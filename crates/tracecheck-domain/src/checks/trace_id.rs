use super::utils::diagnostic;
use crate::classify::CallSite;
use crate::fix;
use crate::model::Expr;
use crate::policy::EffectiveConfig;
use tracecheck_types::{Diagnostic, ids};

pub fn run(
    site: &CallSite<'_>,
    key_values: &[&Expr],
    cfg: &EffectiveConfig,
    out: &mut Vec<Diagnostic>,
) {
    if has_key(key_values, &cfg.correlation_key) {
        return;
    }

    // No end offset: the whole line is highlighted.
    let mut diag = diagnostic(
        site,
        ids::CODE_MISSING_TRACE_ID,
        format!("missing {} in logging keys", cfg.correlation_key),
        site.expr.span.start,
        None,
    );

    match fix::synthesize(site, key_values, cfg) {
        Ok(fix) => diag.suggested_fix = Some(fix),
        Err(err) => {
            tracing::debug!(
                path = %site.file.path,
                offset = site.expr.span.start,
                error = %err,
                "dropping suggested fix"
            );
        }
    }

    out.push(diag);
}

/// Keys sit at even positions. Only keys written as string literals count.
fn has_key(key_values: &[&Expr], key: &str) -> bool {
    key_values
        .iter()
        .step_by(2)
        .any(|k| k.string_literal().as_deref() == Some(key))
}
