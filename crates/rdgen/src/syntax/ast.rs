//! Syntax tree of a grammar file.

use super::Span;

/// `uses "<scanner>"; production*`
#[derive(Debug)]
pub struct Definition {
    pub uses: String,
    pub uses_span: Span,
    pub productions: Vec<Production>,
}

/// `name: expr;`
#[derive(Debug)]
pub struct Production {
    pub name: String,
    pub name_span: Span,
    pub expr: Expr,
}

#[derive(Debug)]
pub enum Expr {
    /// `a | b | ...`, with two or more branches.
    Alternative(Vec<Expr>),
    /// `a b ...`, with two or more items.
    Sequence(Vec<Expr>),
    /// `( expr )`
    Paren(Box<Expr>),
    /// `{ expr }`
    Many(Box<Expr>),
    /// `[ expr ]`
    Optional(Box<Expr>),
    /// A quoted literal, already unescaped.
    LiteralString { value: String, span: Span },
    Identifier { name: String, span: Span },
}
