//! Resolved syntax model handed over by the host parser/type-checker.
//!
//! Offsets are byte offsets into the file's source text. Only the shapes the engine needs are
//! modelled; anything else arrives as [`ExprKind::Opaque`] so traversal can still reach the calls
//! nested inside it.

use serde::{Deserialize, Serialize};
use tracecheck_types::RepoPath;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, offset: u32) -> bool {
        self.start <= offset && offset <= self.end
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SourceFile {
    pub path: RepoPath,
    pub package: PackageClause,
    #[serde(default)]
    pub imports: Vec<ImportDecl>,
    #[serde(default)]
    pub decls: Vec<Decl>,
    /// Original source text. The engine never reads it; the app layer uses it for line/column
    /// mapping and for applying fixes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl SourceFile {
    pub fn import_specs(&self) -> impl Iterator<Item = &ImportSpec> {
        self.imports.iter().flat_map(|d| d.specs.iter())
    }
}

/// `package name`; the span covers the whole clause.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PackageClause {
    pub name: String,
    pub span: Span,
}

/// One `import` declaration. `lparen` is set for the grouped `import ( ... )` form.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImportDecl {
    pub span: Span,
    #[serde(default)]
    pub lparen: Option<u32>,
    #[serde(default)]
    pub specs: Vec<ImportSpec>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ImportSpec {
    pub span: Span,
    /// Local alias (`alias "path"`), if any.
    #[serde(default)]
    pub name: Option<String>,
    /// Unquoted import path.
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decl {
    Func(FuncDecl),
    /// Package-level `var`/`const` declaration.
    Value(ValueDecl),
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FuncDecl {
    pub name: String,
    pub span: Span,
    /// Absent for external (assembly-backed) declarations.
    #[serde(default)]
    pub body: Option<Block>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ValueDecl {
    pub span: Span,
    #[serde(default)]
    pub exprs: Vec<Expr>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Block {
    pub lbrace: u32,
    pub rbrace: u32,
    #[serde(default)]
    pub stmts: Vec<Stmt>,
}

impl Block {
    /// Whether a top-level statement that ends at or before `offset` declares `name`.
    pub fn declares_before(&self, name: &str, offset: u32) -> bool {
        self.stmts
            .iter()
            .filter(|s| s.span.end <= offset)
            .any(|s| s.declares.iter().any(|d| d == name))
    }
}

/// A statement, reduced to what traversal and fix synthesis need.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Stmt {
    pub span: Span,
    /// Names introduced by this statement (`x := ...`, `var x ...`).
    #[serde(default)]
    pub declares: Vec<String>,
    /// Expressions appearing directly in the statement, in source order.
    #[serde(default)]
    pub exprs: Vec<Expr>,
    /// Nested blocks (`if`/`for`/`switch` bodies), in source order.
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Expr {
    pub span: Span,
    /// Resolved type of the expression, when the type-checker recorded one.
    #[serde(default)]
    pub ty: Option<Type>,
    /// Compile-time string value, when the expression is a string constant.
    #[serde(default)]
    pub const_value: Option<String>,
    pub node: ExprKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LitKind {
    String,
    Int,
    Float,
    Imag,
    Char,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExprKind {
    Ident {
        name: String,
    },
    /// `value` is the literal exactly as written, quotes included.
    BasicLit {
        lit: LitKind,
        value: String,
    },
    Selector {
        x: Box<Expr>,
        sel: String,
    },
    Call(CallExpr),
    FuncLit {
        body: Block,
    },
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    Unary {
        op: String,
        x: Box<Expr>,
    },
    Binary {
        x: Box<Expr>,
        op: String,
        y: Box<Expr>,
    },
    Paren {
        x: Box<Expr>,
    },
    Star {
        x: Box<Expr>,
    },
    Composite {
        type_text: String,
        #[serde(default)]
        elts: Vec<Expr>,
    },
    Opaque {
        #[serde(default)]
        children: Vec<Expr>,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    #[serde(default)]
    pub args: Vec<Expr>,
    pub lparen: u32,
    pub rparen: u32,
    /// Position of `...` when the variadic tail is passed as a spread slice.
    #[serde(default)]
    pub ellipsis: Option<u32>,
    /// Statically resolved callee. Absent for calls through function values.
    #[serde(default)]
    pub callee: Option<FuncSymbol>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FuncSymbol {
    /// Import path of the defining package; absent for builtins.
    #[serde(default)]
    pub package: Option<String>,
    pub name: String,
    pub signature: Signature,
}

impl FuncSymbol {
    /// `pkg.Func` or `(pkg.Recv).Method` / `(*pkg.Recv).Method`, for log output.
    pub fn full_name(&self) -> String {
        let pkg = self.package.as_deref().unwrap_or("");
        match self.signature.recv.as_ref() {
            Some(recv) => format!("({}).{}", recv.qualified_name(), self.name),
            None if pkg.is_empty() => self.name.clone(),
            None => format!("{pkg}.{}", self.name),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    #[serde(default)]
    pub recv: Option<Type>,
    /// Parameter types; the last one is the slice type when `variadic` is set.
    #[serde(default)]
    pub params: Vec<Type>,
    #[serde(default)]
    pub variadic: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Basic {
        name: String,
    },
    Named {
        #[serde(default)]
        package: Option<String>,
        name: String,
        #[serde(default)]
        type_params: Vec<String>,
    },
    Pointer {
        elem: Box<Type>,
    },
    Slice {
        elem: Box<Type>,
    },
    Interface {
        #[serde(default)]
        methods: Vec<String>,
    },
    Func,
    Other {
        #[serde(default)]
        name: String,
    },
}

impl Type {
    /// `[]interface{}` (or `[]any`).
    pub fn is_empty_interface_slice(&self) -> bool {
        match self {
            Type::Slice { elem } => matches!(elem.as_ref(), Type::Interface { methods } if methods.is_empty()),
            _ => false,
        }
    }

    /// True for the named type `package.name`, also through a pointer.
    /// `package` is compared after vendor normalization.
    pub fn is_named(&self, package: &str, name: &str) -> bool {
        match self {
            Type::Named {
                package: Some(p),
                name: n,
                ..
            } => n == name && crate::rules::vendorless_path(p) == package,
            Type::Pointer { elem } => elem.is_named(package, name),
            _ => false,
        }
    }

    fn qualified_name(&self) -> String {
        match self {
            Type::Named {
                package: Some(p),
                name,
                ..
            } => format!("{p}.{name}"),
            Type::Named { name, .. } => name.clone(),
            Type::Pointer { elem } => format!("*{}", elem.qualified_name()),
            Type::Basic { name } | Type::Other { name } => name.clone(),
            Type::Slice { elem } => format!("[]{}", elem.qualified_name()),
            Type::Interface { .. } => "interface{}".to_string(),
            Type::Func => "func".to_string(),
        }
    }
}

impl Expr {
    pub fn new(span: Span, node: ExprKind) -> Self {
        Self {
            span,
            ty: None,
            const_value: None,
            node,
        }
    }

    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.node {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Unquoted value of a string literal written inline at this position.
    pub fn string_literal(&self) -> Option<String> {
        match &self.node {
            ExprKind::BasicLit {
                lit: LitKind::String,
                value,
            } => unquote(value),
            _ => None,
        }
    }

    /// Compile-time string value: an inline literal or a resolved string constant.
    pub fn constant_string(&self) -> Option<String> {
        self.string_literal().or_else(|| self.const_value.clone())
    }
}

/// Unquote a string literal written as `"..."` (with escapes) or `` `...` `` (raw).
pub fn unquote(lit: &str) -> Option<String> {
    if lit.len() >= 2 && lit.starts_with('`') && lit.ends_with('`') {
        return Some(lit[1..lit.len() - 1].to_string());
    }
    if lit.len() < 2 || !lit.starts_with('"') || !lit.ends_with('"') {
        return None;
    }

    let inner = &lit[1..lit.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'a' => out.push('\u{07}'),
            'b' => out.push('\u{08}'),
            'f' => out.push('\u{0C}'),
            'v' => out.push('\u{0B}'),
            '\\' => out.push('\\'),
            '"' => out.push('"'),
            '\'' => out.push('\''),
            'x' => out.push(hex_escape(&mut chars, 2)?),
            'u' => out.push(hex_escape(&mut chars, 4)?),
            'U' => out.push(hex_escape(&mut chars, 8)?),
            _ => return None,
        }
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let hex: String = chars.by_ref().take(digits).collect();
    if hex.len() != digits {
        return None;
    }
    u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32)
}
