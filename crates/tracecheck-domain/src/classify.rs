//! Call classification: which rule (and therefore which policy) governs a call site.

use crate::model::{Block, CallExpr, Expr, FuncSymbol, Signature, SourceFile};
use crate::policy::{EffectiveConfig, Policy, PolicyTable};
use crate::registry::RuleRegistry;
use crate::visit::CallVisit;

/// One visited call expression. The originating file is attached by the traversal.
#[derive(Clone, Copy, Debug)]
pub struct CallSite<'a> {
    pub file: &'a SourceFile,
    pub expr: &'a Expr,
    pub call: &'a CallExpr,
    /// Innermost function body containing the call; `None` at package level.
    pub enclosing_body: Option<&'a Block>,
}

impl<'a> CallSite<'a> {
    pub fn new(file: &'a SourceFile, visit: CallVisit<'a>) -> Option<Self> {
        let call = visit.expr.as_call()?;
        Some(Self {
            file,
            expr: visit.expr,
            call,
            enclosing_body: visit.enclosing_body,
        })
    }

    pub fn callee(&self) -> Option<&'a FuncSymbol> {
        self.call.callee.as_ref()
    }

    pub fn signature(&self) -> Option<&'a Signature> {
        self.callee().map(|f| &f.signature)
    }

    /// Arguments bound to the final, variadic parameter.
    pub fn variadic_tail(&self) -> &'a [Expr] {
        let fixed = self
            .signature()
            .map_or(0, |sig| sig.params.len().saturating_sub(1));
        self.call.args.get(fixed..).unwrap_or(&[])
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    /// Registry position of the winning rule.
    pub rule: usize,
    pub policy: Policy,
}

/// Select the rule for a call site, or `None` when the call is not subject to validation.
///
/// Calls through function values, non-variadic callees and spread (`args...`) tails are
/// unanalyzable and never classified.
pub fn classify(
    site: &CallSite<'_>,
    registry: &RuleRegistry,
    policies: &PolicyTable,
    cfg: &EffectiveConfig,
) -> Option<Classification> {
    let Some(func) = site.callee() else {
        tracing::debug!(offset = site.expr.span.start, "skipping call without a resolved callee");
        return None;
    };
    if !func.signature.variadic {
        return None;
    }
    if site.call.ellipsis.is_some() {
        tracing::debug!(callee = %func.full_name(), "skipping spread variadic call");
        return None;
    }
    let package = func.package.as_deref()?;

    for &position in registry.lookup(package) {
        let rule = registry.rule(position);
        if cfg.is_disabled(&rule.policy_name) {
            continue;
        }
        // Only field-accumulating calls are validated; emitting calls are not.
        if !func.name.ends_with(&cfg.accumulator_suffix) {
            continue;
        }
        if !rule.matches(func) {
            continue;
        }
        return Some(Classification {
            rule: position,
            policy: policies.resolve(&rule.policy_name),
        });
    }

    None
}
