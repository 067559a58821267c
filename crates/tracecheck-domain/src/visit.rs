//! Pre-order traversal over the call expressions of a file.

use crate::model::{Block, Decl, Expr, ExprKind, SourceFile};

/// A call expression reached by the traversal, together with the body of the innermost
/// function (declaration or literal) that lexically contains it.
#[derive(Clone, Copy, Debug)]
pub struct CallVisit<'a> {
    pub expr: &'a Expr,
    pub enclosing_body: Option<&'a Block>,
}

/// Visit every call in `file` in source pre-order: a call is visited before the calls nested in
/// its callee and arguments.
pub fn walk_calls<'a, F>(file: &'a SourceFile, f: &mut F)
where
    F: FnMut(CallVisit<'a>),
{
    for decl in &file.decls {
        match decl {
            Decl::Func(func) => {
                if let Some(body) = &func.body {
                    walk_block(body, Some(body), f);
                }
            }
            Decl::Value(value) => {
                for expr in &value.exprs {
                    walk_expr(expr, None, f);
                }
            }
        }
    }
}

fn walk_block<'a, F>(block: &'a Block, body: Option<&'a Block>, f: &mut F)
where
    F: FnMut(CallVisit<'a>),
{
    for stmt in &block.stmts {
        for expr in &stmt.exprs {
            walk_expr(expr, body, f);
        }
        for nested in &stmt.blocks {
            walk_block(nested, body, f);
        }
    }
}

fn walk_expr<'a, F>(expr: &'a Expr, body: Option<&'a Block>, f: &mut F)
where
    F: FnMut(CallVisit<'a>),
{
    match &expr.node {
        ExprKind::Call(call) => {
            f(CallVisit {
                expr,
                enclosing_body: body,
            });
            walk_expr(&call.fun, body, f);
            for arg in &call.args {
                walk_expr(arg, body, f);
            }
        }
        // A literal starts a new innermost function.
        ExprKind::FuncLit { body: inner } => walk_block(inner, Some(inner), f),
        ExprKind::Selector { x, .. }
        | ExprKind::Unary { x, .. }
        | ExprKind::Paren { x }
        | ExprKind::Star { x } => walk_expr(x, body, f),
        ExprKind::Index { x, index } => {
            walk_expr(x, body, f);
            walk_expr(index, body, f);
        }
        ExprKind::Binary { x, y, .. } => {
            walk_expr(x, body, f);
            walk_expr(y, body, f);
        }
        ExprKind::Composite { elts, .. } => {
            for e in elts {
                walk_expr(e, body, f);
            }
        }
        ExprKind::Opaque { children } => {
            for e in children {
                walk_expr(e, body, f);
            }
        }
        ExprKind::Ident { .. } | ExprKind::BasicLit { .. } => {}
    }
}
