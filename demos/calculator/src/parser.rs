mod generated {
    include!(concat!(env!("OUT_DIR"), "/calculator.rs"));
}
pub use generated::*;

use crate::{
    lexer::{Lexeme, TokenStream},
    syntax::{self, BinOp},
};
use rdgen_runtime::SyntaxError;
use std::marker::PhantomData;

pub type ParseError<'source> = SyntaxError<TToken, Lexeme<'source>>;

/// Parse the input into a syntax tree.
pub fn parse(input: &str) -> Result<Box<syntax::Expr<'_>>, ParseError<'_>> {
    let span = tracing::trace_span!("parse");
    let _entered = span.enter();
    parse_expr(TokenStream::new(input), &mut Builder(PhantomData))
}

/// Evaluate the input while parsing it, without building a syntax tree.
pub fn evaluate(input: &str) -> Result<f64, ParseError<'_>> {
    let span = tracing::trace_span!("evaluate");
    let _entered = span.enter();
    parse_expr(TokenStream::new(input), &mut Evaluator(PhantomData))
}

/// Render a syntax error for the command line.
pub fn describe(input: &str, err: &ParseError<'_>) -> anyhow::Error {
    let found = match err.found.kind {
        TToken::EOS => "end of input".to_owned(),
        _ => format!("`{}'", err.found.text),
    };
    let expected: Vec<String> = err
        .expected
        .iter()
        .map(|kind| match kind.literal() {
            Some(text) => format!("`{}'", text),
            None => format!("{:?}", kind),
        })
        .collect();
    anyhow::anyhow!(
        "{}\n{:>width$}^ unexpected {}, expected {}",
        input,
        "",
        found,
        expected.join(" or "),
        width = err.found.span.start,
    )
}

fn fold<'s, Op>(
    first: Box<syntax::Expr<'s>>,
    rest: Vec<(Op, Box<syntax::Expr<'s>>)>,
    op: impl Fn(&Op) -> BinOp,
) -> Box<syntax::Expr<'s>> {
    rest.into_iter().fold(first, |lhs, (o, rhs)| {
        Box::new(syntax::Expr::Binary {
            op: op(&o),
            lhs,
            rhs,
        })
    })
}

struct Builder<'s>(PhantomData<&'s str>);

impl<'s> Visitor for Builder<'s> {
    type Token = Lexeme<'s>;
    type Expr = Box<syntax::Expr<'s>>;
    type Term = Box<syntax::Expr<'s>>;
    type Unary = Box<syntax::Expr<'s>>;
    type Atom = Box<syntax::Expr<'s>>;

    fn visit_expr(
        &mut self,
        a1: Self::Term,
        a2: Vec<(ExprChoice1<Self>, Self::Term)>,
    ) -> Self::Expr {
        tracing::trace!("reduce: expr -> term {{(`+' | `-') term}}");
        fold(a1, a2, |op| match op {
            ExprChoice1::Alt1(..) => BinOp::Add,
            ExprChoice1::Alt2(..) => BinOp::Sub,
        })
    }

    fn visit_term(
        &mut self,
        a1: Self::Unary,
        a2: Vec<(TermChoice1<Self>, Self::Unary)>,
    ) -> Self::Term {
        tracing::trace!("reduce: term -> unary {{(`*' | `/') unary}}");
        fold(a1, a2, |op| match op {
            TermChoice1::Alt1(..) => BinOp::Mul,
            TermChoice1::Alt2(..) => BinOp::Div,
        })
    }

    fn visit_unary1(&mut self, _: Lexeme<'s>, a2: Self::Unary) -> Self::Unary {
        tracing::trace!("reduce: unary -> `-' unary");
        Box::new(syntax::Expr::Neg(a2))
    }

    fn visit_unary2(&mut self, a: Self::Atom) -> Self::Unary {
        a
    }

    fn visit_atom1(&mut self, a: Lexeme<'s>) -> Self::Atom {
        tracing::trace!("reduce: atom -> Number");
        Box::new(syntax::Expr::Num(a.text))
    }

    fn visit_atom2(&mut self, _: Lexeme<'s>, a2: Self::Expr, _: Lexeme<'s>) -> Self::Atom {
        tracing::trace!("reduce: atom -> `(' expr `)'");
        Box::new(syntax::Expr::Paren(a2))
    }
}

struct Evaluator<'s>(PhantomData<&'s str>);

impl<'s> Visitor for Evaluator<'s> {
    type Token = Lexeme<'s>;
    type Expr = f64;
    type Term = f64;
    type Unary = f64;
    type Atom = f64;

    fn visit_expr(&mut self, a1: f64, a2: Vec<(ExprChoice1<Self>, f64)>) -> f64 {
        a2.into_iter().fold(a1, |acc, (op, rhs)| match op {
            ExprChoice1::Alt1(..) => acc + rhs,
            ExprChoice1::Alt2(..) => acc - rhs,
        })
    }

    fn visit_term(&mut self, a1: f64, a2: Vec<(TermChoice1<Self>, f64)>) -> f64 {
        a2.into_iter().fold(a1, |acc, (op, rhs)| match op {
            TermChoice1::Alt1(..) => acc * rhs,
            TermChoice1::Alt2(..) => acc / rhs,
        })
    }

    fn visit_unary1(&mut self, _: Lexeme<'s>, a2: f64) -> f64 {
        -a2
    }

    fn visit_unary2(&mut self, a: f64) -> f64 {
        a
    }

    fn visit_atom1(&mut self, a: Lexeme<'s>) -> f64 {
        a.text.parse().unwrap_or(f64::NAN)
    }

    fn visit_atom2(&mut self, _: Lexeme<'s>, a2: f64, _: Lexeme<'s>) -> f64 {
        a2
    }
}
