use crate::classify::CallSite;
use crate::fix::{SynthesisError, synthesize};
use crate::model::{
    Block, CallExpr, Decl, Expr, ExprKind, FuncDecl, FuncSymbol, ImportDecl, ImportSpec, LitKind,
    PackageClause, Signature, SourceFile, Span, Stmt, Type, unquote,
};
use crate::policy::{EffectiveConfig, Policy};
use crate::visit::CallVisit;
use tracecheck_types::{RepoPath, SuggestedFix};

pub fn ident(name: &str, start: u32) -> Expr {
    Expr::new(
        Span::new(start, start + name.len() as u32),
        ExprKind::Ident {
            name: name.to_string(),
        },
    )
}

/// `raw` is the literal as written, quotes included.
pub fn str_lit(raw: &str, start: u32) -> Expr {
    Expr::new(
        Span::new(start, start + raw.len() as u32),
        ExprKind::BasicLit {
            lit: LitKind::String,
            value: raw.to_string(),
        },
    )
}

/// `x.sel`, ending at `end`.
pub fn selector(x: Expr, sel: &str, end: u32) -> Expr {
    Expr::new(
        Span::new(x.span.start, end),
        ExprKind::Selector {
            x: Box::new(x),
            sel: sel.to_string(),
        },
    )
}

pub fn call(
    fun: Expr,
    args: Vec<Expr>,
    lparen: u32,
    rparen: u32,
    callee: Option<FuncSymbol>,
) -> Expr {
    Expr::new(
        Span::new(fun.span.start, rparen + 1),
        ExprKind::Call(CallExpr {
            fun: Box::new(fun),
            args,
            lparen,
            rparen,
            ellipsis: None,
            callee,
        }),
    )
}

pub fn func_lit(start: u32, lbrace: u32, rbrace: u32, stmts: Vec<Stmt>) -> Expr {
    Expr::new(
        Span::new(start, rbrace + 1),
        ExprKind::FuncLit {
            body: Block {
                lbrace,
                rbrace,
                stmts,
            },
        },
    )
}

pub fn stmt(exprs: Vec<Expr>) -> Stmt {
    let span = match (exprs.first(), exprs.last()) {
        (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
        _ => Span::default(),
    };
    Stmt {
        span,
        declares: Vec::new(),
        exprs,
        blocks: Vec::new(),
    }
}

/// A file with a single function `F` whose body spans `lbrace..=rbrace`.
pub fn func_file(path: &str, lbrace: u32, rbrace: u32, stmts: Vec<Stmt>) -> SourceFile {
    SourceFile {
        path: RepoPath::new(path),
        package: PackageClause {
            name: "a".to_string(),
            span: Span::new(0, 9),
        },
        imports: Vec::new(),
        decls: vec![Decl::Func(FuncDecl {
            name: "F".to_string(),
            span: Span::new(lbrace, rbrace + 1),
            body: Some(Block {
                lbrace,
                rbrace,
                stmts,
            }),
        })],
        source: None,
    }
}

pub fn any_slice() -> Type {
    Type::Slice {
        elem: Box::new(Type::Interface { methods: vec![] }),
    }
}

/// `(github.com/go-logr/logr.Logger).WithValues(keysAndValues ...interface{})`
pub fn logr_with_values() -> FuncSymbol {
    let package = "github.com/go-logr/logr".to_string();
    FuncSymbol {
        package: Some(package.clone()),
        name: "WithValues".to_string(),
        signature: Signature {
            recv: Some(Type::Named {
                package: Some(package),
                name: "Logger".to_string(),
                type_params: vec![],
            }),
            params: vec![any_slice()],
            variadic: true,
        },
    }
}

enum BodyLine {
    Plain { text: String, declares: Vec<String> },
    Call(String),
}

/// Lays out a small Go file and the matching syntax model with exact offsets.
///
/// Call statements are written `log := <call>`; the call text understands identifiers, string
/// literals, selectors and calls. The outermost call of every call statement resolves to the
/// builder's callee.
pub struct SourceBuilder {
    imports: Vec<String>,
    body: Vec<BodyLine>,
    callee: Option<FuncSymbol>,
}

pub struct BuiltSource {
    pub text: String,
    pub file: SourceFile,
}

impl Default for SourceBuilder {
    fn default() -> Self {
        Self {
            imports: Vec::new(),
            body: Vec::new(),
            callee: Some(logr_with_values()),
        }
    }
}

impl SourceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `ctx` and `zapr.NewLogger(...).WithValues("eventType", e, "deliverID", d)`.
    pub fn zapr_event_call() -> BuiltSource {
        Self::new()
            .import_line("\"github.com/go-logr/zapr\"")
            .import_line("\"go.uber.org/zap\"")
            .import_line("\"context\"")
            .body_call("zapr.NewLogger(z).WithValues(\"eventType\", e, \"deliverID\", d)")
            .build()
    }

    /// One spec of the grouped import declaration, written as it appears in source.
    pub fn import_line(mut self, spec: &str) -> Self {
        self.imports.push(spec.to_string());
        self
    }

    pub fn body_stmt(mut self, text: &str, declares: &[&str]) -> Self {
        self.body.push(BodyLine::Plain {
            text: text.to_string(),
            declares: declares.iter().map(|d| d.to_string()).collect(),
        });
        self
    }

    pub fn body_call(mut self, text: &str) -> Self {
        self.body.push(BodyLine::Call(text.to_string()));
        self
    }

    pub fn callee(mut self, callee: Option<FuncSymbol>) -> Self {
        self.callee = callee;
        self
    }

    pub fn build(self) -> BuiltSource {
        let mut text = String::from("package a");
        let package = PackageClause {
            name: "a".to_string(),
            span: Span::new(0, text.len() as u32),
        };
        text.push_str("\n\n");

        let mut imports = Vec::new();
        if !self.imports.is_empty() {
            let decl_start = offset(&text);
            text.push_str("import (");
            let lparen = offset(&text) - 1;
            let mut specs = Vec::new();
            for spec in &self.imports {
                text.push_str("\n\t");
                let start = offset(&text);
                text.push_str(spec);
                specs.push(import_spec(spec, start));
            }
            text.push_str("\n)");
            imports.push(ImportDecl {
                span: Span::new(decl_start, offset(&text)),
                lparen: Some(lparen),
                specs,
            });
            text.push_str("\n\n");
        }

        let func_start = offset(&text);
        text.push_str("func F(ctx context.Context) {");
        let lbrace = offset(&text) - 1;
        let mut stmts = Vec::new();
        for line in self.body {
            text.push_str("\n\t");
            let start = offset(&text);
            match line {
                BodyLine::Plain {
                    text: line,
                    declares,
                } => {
                    text.push_str(&line);
                    stmts.push(Stmt {
                        span: Span::new(start, offset(&text)),
                        declares,
                        exprs: Vec::new(),
                        blocks: Vec::new(),
                    });
                }
                BodyLine::Call(call_text) => {
                    text.push_str("log := ");
                    let base = offset(&text);
                    text.push_str(&call_text);
                    let mut expr = ExprParser::new(&call_text, base).parse();
                    if let ExprKind::Call(c) = &mut expr.node {
                        c.callee = self.callee.clone();
                    }
                    stmts.push(Stmt {
                        span: Span::new(start, offset(&text)),
                        declares: vec!["log".to_string()],
                        exprs: vec![expr],
                        blocks: Vec::new(),
                    });
                }
            }
        }
        text.push_str("\n}");
        let rbrace = offset(&text) - 1;
        text.push('\n');

        let file = SourceFile {
            path: RepoPath::new("a.go"),
            package,
            imports,
            decls: vec![Decl::Func(FuncDecl {
                name: "F".to_string(),
                span: Span::new(func_start, rbrace + 1),
                body: Some(Block {
                    lbrace,
                    rbrace,
                    stmts,
                }),
            })],
            source: Some(text.clone()),
        };
        BuiltSource { text, file }
    }
}

impl BuiltSource {
    pub fn body(&self) -> &Block {
        match self.file.decls.first() {
            Some(Decl::Func(FuncDecl { body: Some(b), .. })) => b,
            _ => panic!("built source always has a function body"),
        }
    }

    /// Outermost call of every call statement, in source order.
    pub fn sites(&self) -> Vec<CallSite<'_>> {
        let body = self.body();
        body.stmts
            .iter()
            .filter_map(|s| s.exprs.first())
            .filter_map(|expr| {
                CallSite::new(
                    &self.file,
                    CallVisit {
                        expr,
                        enclosing_body: Some(body),
                    },
                )
            })
            .collect()
    }

    /// The last call statement's site.
    pub fn site(&self) -> CallSite<'_> {
        self.sites().pop().expect("source has a call statement")
    }

    /// Fix for the last call statement, with general key/value filtering.
    pub fn fix(&self, cfg: &EffectiveConfig) -> Result<SuggestedFix, SynthesisError> {
        let site = self.site();
        let key_values = Policy::General.filter_key_values(site.variadic_tail());
        synthesize(&site, &key_values, cfg)
    }
}

fn offset(text: &str) -> u32 {
    text.len() as u32
}

fn import_spec(spec: &str, start: u32) -> ImportSpec {
    let (name, quoted) = match spec.split_once(' ') {
        Some((name, quoted)) => (Some(name.to_string()), quoted),
        None => (None, spec),
    };
    ImportSpec {
        span: Span::new(start, start + spec.len() as u32),
        name,
        path: unquote(quoted).expect("quoted import path"),
    }
}

/// Recursive-descent reader for the call text accepted by [`SourceBuilder::body_call`].
struct ExprParser<'s> {
    src: &'s [u8],
    pos: usize,
    base: u32,
}

impl<'s> ExprParser<'s> {
    fn new(src: &'s str, base: u32) -> Self {
        Self {
            src: src.as_bytes(),
            pos: 0,
            base,
        }
    }

    fn parse(mut self) -> Expr {
        let expr = self.expr();
        assert_eq!(self.pos, self.src.len(), "trailing input in call text");
        expr
    }

    fn at(&self) -> u32 {
        self.base + self.pos as u32
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn expr(&mut self) -> Expr {
        let mut expr = self.primary();
        loop {
            match self.peek() {
                Some(b'.') => {
                    self.pos += 1;
                    let name = self.word();
                    expr = selector(expr, &name, self.at());
                }
                Some(b'(') => {
                    let lparen = self.at();
                    self.pos += 1;
                    let mut args = Vec::new();
                    while self.peek() != Some(b')') {
                        args.push(self.expr());
                        if self.peek() == Some(b',') {
                            self.pos += 1;
                            while self.peek() == Some(b' ') {
                                self.pos += 1;
                            }
                        }
                    }
                    let rparen = self.at();
                    self.pos += 1;
                    expr = call(expr, args, lparen, rparen, None);
                }
                _ => return expr,
            }
        }
    }

    fn primary(&mut self) -> Expr {
        let start = self.at();
        if self.peek() == Some(b'"') {
            let from = self.pos;
            self.pos += 1;
            while self.peek().is_some_and(|c| c != b'"') {
                self.pos += 1;
            }
            self.pos += 1;
            let raw = String::from_utf8_lossy(&self.src[from..self.pos]).into_owned();
            return str_lit(&raw, start);
        }
        let name = self.word();
        assert!(!name.is_empty(), "expected an expression at offset {start}");
        ident(&name, start)
    }

    fn word(&mut self) -> String {
        let from = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == b'_')
        {
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.src[from..self.pos]).into_owned()
    }
}
