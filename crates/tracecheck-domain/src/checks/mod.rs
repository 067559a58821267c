//! Key/value validation of classified logging calls.

use crate::classify::CallSite;
use crate::model::{Expr, ExprKind};
use crate::policy::{EffectiveConfig, Policy};
use tracecheck_types::Diagnostic;

mod parity;
mod printf;
mod string_keys;
mod trace_id;
mod utils;

#[cfg(test)]
mod tests;

pub use printf::find_printf_specifier;

pub(crate) use printf::run as check_printf;
pub(crate) use string_keys::run as check_keys;

/// Validate one classified call site.
///
/// Produces nothing unless the callee's final parameter is a `...interface{}` tail.
pub fn validate(site: &CallSite<'_>, policy: Policy, cfg: &EffectiveConfig) -> Vec<Diagnostic> {
    let mut out = Vec::new();

    let Some(sig) = site.signature() else {
        return out;
    };
    let Some(last) = sig.params.last() else {
        return out;
    };
    if !last.is_empty_interface_slice() {
        return out;
    }

    let key_values = policy.filter_key_values(site.variadic_tail());

    parity::run(site, &key_values, &mut out);

    if is_constructor_derived(site, cfg) {
        trace_id::run(site, &key_values, cfg, &mut out);
    }

    if cfg.require_string_key {
        out.extend(policy.check_keys(site, &key_values));
    }

    if cfg.no_printf_like {
        out.extend(policy.check_printf(site, &site.call.args));
    }

    out
}

/// `ctor(...).Method(...)` where `ctor` is `pkg.NewLogger` or a bare `NewLogger`.
fn is_constructor_derived(site: &CallSite<'_>, cfg: &EffectiveConfig) -> bool {
    let ExprKind::Selector { x, .. } = &site.call.fun.node else {
        return false;
    };
    let Some(receiver) = x.as_call() else {
        return false;
    };
    constructor_name(&receiver.fun).is_some_and(|name| cfg.is_logger_constructor(name))
}

fn constructor_name(fun: &Expr) -> Option<&str> {
    match &fun.node {
        ExprKind::Selector { sel, .. } => Some(sel),
        ExprKind::Ident { name } => Some(name),
        _ => None,
    }
}
