//! Canonical re-printing of argument expressions.
//!
//! Original formatting is not preserved: operators get single spaces, argument lists are joined
//! with `", "`.

use crate::model::{Expr, ExprKind};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrintError {
    #[error("function literal at offset {0} cannot be re-printed")]
    FuncLit(u32),
    #[error("expression at offset {0} is opaque and cannot be re-printed")]
    Opaque(u32),
}

pub fn print_expr(expr: &Expr) -> Result<String, PrintError> {
    let mut out = String::new();
    write_expr(&mut out, expr)?;
    Ok(out)
}

fn write_expr(out: &mut String, expr: &Expr) -> Result<(), PrintError> {
    match &expr.node {
        ExprKind::Ident { name } => out.push_str(name),
        ExprKind::BasicLit { value, .. } => out.push_str(value),
        ExprKind::Selector { x, sel } => {
            write_expr(out, x)?;
            out.push('.');
            out.push_str(sel);
        }
        ExprKind::Call(call) => {
            write_expr(out, &call.fun)?;
            out.push('(');
            write_list(out, &call.args)?;
            if call.ellipsis.is_some() {
                out.push_str("...");
            }
            out.push(')');
        }
        ExprKind::Index { x, index } => {
            write_expr(out, x)?;
            out.push('[');
            write_expr(out, index)?;
            out.push(']');
        }
        ExprKind::Unary { op, x } => {
            out.push_str(op);
            write_expr(out, x)?;
        }
        ExprKind::Binary { x, op, y } => {
            write_expr(out, x)?;
            out.push(' ');
            out.push_str(op);
            out.push(' ');
            write_expr(out, y)?;
        }
        ExprKind::Paren { x } => {
            out.push('(');
            write_expr(out, x)?;
            out.push(')');
        }
        ExprKind::Star { x } => {
            out.push('*');
            write_expr(out, x)?;
        }
        ExprKind::Composite { type_text, elts } => {
            out.push_str(type_text);
            out.push('{');
            write_list(out, elts)?;
            out.push('}');
        }
        ExprKind::FuncLit { .. } => return Err(PrintError::FuncLit(expr.span.start)),
        ExprKind::Opaque { .. } => return Err(PrintError::Opaque(expr.span.start)),
    }
    Ok(())
}

fn write_list(out: &mut String, exprs: &[Expr]) -> Result<(), PrintError> {
    for (i, e) in exprs.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_expr(out, e)?;
    }
    Ok(())
}

const ELLIPSIS_MAX_CHARS: usize = 40;

/// Short rendering for messages: truncated with `...`, and a placeholder when the expression
/// cannot be printed at all.
pub fn render_ellipsis(expr: &Expr) -> String {
    let Ok(text) = print_expr(expr) else {
        return "<expr>".to_string();
    };
    if text.chars().count() <= ELLIPSIS_MAX_CHARS {
        return text;
    }
    let head: String = text.chars().take(ELLIPSIS_MAX_CHARS - 3).collect();
    format!("{head}...")
}
