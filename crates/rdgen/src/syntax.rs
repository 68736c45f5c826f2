//! Reader for grammar files.
//!
//! The notation is described by `syntax/rdgen.llg`, and `syntax/parser.rs`
//! is the parser generated from it.

pub mod ast;
pub mod lexer;
#[allow(dead_code)]
mod parser;

use self::{
    lexer::{Lexer, Spanned, Token},
    parser::{TToken, Visitor},
};
use crate::scanner::{ScannerDef, ScannerDefError};
use lexgen_util::Loc;
use rdgen_runtime::{Scanner, SyntaxError};
use std::{fmt, iter, marker::PhantomData};

/// A range in the source text.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: Loc,
    pub end: Loc,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start.line + 1, self.start.col + 1)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("{}: unrecognized character", .location)]
    Lexer { location: Span },

    #[error(
        "{}: unexpected {}, expected {}",
        .location,
        .found,
        crate::util::join(.expected, " or ")
    )]
    UnexpectedToken {
        found: String,
        location: Span,
        expected: Vec<&'static str>,
    },
}

impl From<SyntaxError<TToken, Lexeme<'_>>> for ParseError {
    fn from(err: SyntaxError<TToken, Lexeme<'_>>) -> Self {
        ParseError::UnexpectedToken {
            found: err.found.token.map_or_else(|| "end of input".into(), describe),
            location: err.found.span,
            expected: err.expected.into_iter().map(describe_kind).collect(),
        }
    }
}

/// The terminals of the grammar file notation, as declared in `rdgen.llg`.
pub fn scanner_def() -> Result<ScannerDef, ScannerDefError> {
    ScannerDef::define(|s| {
        s.literal("Uses", "uses")?;
        s.pattern("LiteralString", r#""([^"\\]|\\.)*""#)?;
        s.pattern("Identifier", "$$XID_Start $$XID_Continue*")?;
        s.literal("Colon", ":")?;
        s.literal("Semicolon", ";")?;
        s.literal("Bar", "|")?;
        s.literal("LParen", "(")?;
        s.literal("RParen", ")")?;
        s.literal("LCurly", "{")?;
        s.literal("RCurly", "}")?;
        s.literal("LBracket", "[")?;
        s.literal("RBracket", "]")?;
        Ok(())
    })
}

/// Parse the source text of a grammar file.
pub fn parse(source: &str) -> Result<ast::Definition, ParseError> {
    let span = tracing::trace_span!("parse");
    let _entered = span.enter();

    let mut tokens = vec![];
    for token in Lexer::new(source) {
        let token = token.map_err(|err| ParseError::Lexer {
            location: Span {
                start: err.location,
                end: err.location,
            },
        })?;
        tokens.push(token);
    }
    tracing::trace!("{} token(s) read", tokens.len());

    let tokens = Tokens {
        tokens,
        pos: 0,
        eoi: end_of_input(source),
    };
    let def = parser::parse_definition(tokens, &mut Builder(PhantomData))?;
    Ok(def)
}

fn end_of_input(source: &str) -> Loc {
    let line = source.matches('\n').count();
    let col = source.rsplit('\n').next().map_or(0, |s| s.chars().count());
    Loc {
        line: line as u32,
        col: col as u32,
        byte_idx: source.len(),
    }
}

/// A token handed to the parser, or the end of input.
#[derive(Debug, Copy, Clone)]
pub struct Lexeme<'input> {
    token: Option<Token<'input>>,
    span: Span,
}

impl<'input> Lexeme<'input> {
    fn text(&self) -> &'input str {
        match self.token {
            Some(Token::LiteralString(text) | Token::Identifier(text)) => text,
            _ => "",
        }
    }
}

struct Tokens<'input> {
    tokens: Vec<Spanned<'input>>,
    pos: usize,
    eoi: Loc,
}

impl<'input> Scanner for Tokens<'input> {
    type Kind = TToken;
    type Token = Lexeme<'input>;

    fn kind(&self) -> TToken {
        match self.tokens.get(self.pos) {
            Some((_, token, _)) => kind_of(*token),
            None => TToken::EOS,
        }
    }

    fn advance(&mut self) -> Lexeme<'input> {
        let lexeme = match self.tokens.get(self.pos) {
            Some(&(start, token, end)) => Lexeme {
                token: Some(token),
                span: Span { start, end },
            },
            None => Lexeme {
                token: None,
                span: Span {
                    start: self.eoi,
                    end: self.eoi,
                },
            },
        };
        self.pos = (self.pos + 1).min(self.tokens.len());
        lexeme
    }
}

fn kind_of(token: Token<'_>) -> TToken {
    match token {
        Token::Uses => TToken::Uses,
        Token::Colon => TToken::Colon,
        Token::Semicolon => TToken::Semicolon,
        Token::Bar => TToken::Bar,
        Token::LParen => TToken::LParen,
        Token::RParen => TToken::RParen,
        Token::LCurly => TToken::LCurly,
        Token::RCurly => TToken::RCurly,
        Token::LBracket => TToken::LBracket,
        Token::RBracket => TToken::RBracket,
        Token::LiteralString(..) => TToken::LiteralString,
        Token::Identifier(..) => TToken::Identifier,
    }
}

/// Builds the syntax tree.
struct Builder<'input>(PhantomData<&'input str>);

impl<'input> Visitor for Builder<'input> {
    type Token = Lexeme<'input>;
    type Definition = ast::Definition;
    type Production = ast::Production;
    type Expr = ast::Expr;
    type Sequence = ast::Expr;
    type Factor = ast::Expr;

    fn visit_definition(
        &mut self,
        _: Lexeme<'input>,
        a2: Lexeme<'input>,
        _: Lexeme<'input>,
        a4: Vec<ast::Production>,
    ) -> ast::Definition {
        ast::Definition {
            uses: lexer::unescape(a2.text()),
            uses_span: a2.span,
            productions: a4,
        }
    }

    fn visit_production(
        &mut self,
        a1: Lexeme<'input>,
        _: Lexeme<'input>,
        a3: ast::Expr,
        _: Lexeme<'input>,
    ) -> ast::Production {
        tracing::trace!("production {}", a1.text());
        ast::Production {
            name: a1.text().to_owned(),
            name_span: a1.span,
            expr: a3,
        }
    }

    fn visit_expr(&mut self, a1: ast::Expr, a2: Vec<(Lexeme<'input>, ast::Expr)>) -> ast::Expr {
        if a2.is_empty() {
            return a1;
        }
        let branches = iter::once(a1).chain(a2.into_iter().map(|(_, branch)| branch));
        ast::Expr::Alternative(branches.collect())
    }

    fn visit_sequence(&mut self, a1: ast::Expr, a2: Vec<ast::Expr>) -> ast::Expr {
        if a2.is_empty() {
            return a1;
        }
        ast::Expr::Sequence(iter::once(a1).chain(a2).collect())
    }

    fn visit_factor1(&mut self, a: Lexeme<'input>) -> ast::Expr {
        ast::Expr::LiteralString {
            value: lexer::unescape(a.text()),
            span: a.span,
        }
    }

    fn visit_factor2(&mut self, a: Lexeme<'input>) -> ast::Expr {
        ast::Expr::Identifier {
            name: a.text().to_owned(),
            span: a.span,
        }
    }

    fn visit_factor3(&mut self, _: Lexeme<'input>, a2: ast::Expr, _: Lexeme<'input>) -> ast::Expr {
        ast::Expr::Paren(Box::new(a2))
    }

    fn visit_factor4(&mut self, _: Lexeme<'input>, a2: ast::Expr, _: Lexeme<'input>) -> ast::Expr {
        ast::Expr::Many(Box::new(a2))
    }

    fn visit_factor5(&mut self, _: Lexeme<'input>, a2: ast::Expr, _: Lexeme<'input>) -> ast::Expr {
        ast::Expr::Optional(Box::new(a2))
    }
}

fn describe(token: Token<'_>) -> String {
    match token {
        Token::LiteralString(literal) => format!("literal {}", literal),
        Token::Identifier(name) => format!("identifier `{}`", name),
        token => describe_kind(kind_of(token)).to_owned(),
    }
}

fn describe_kind(kind: TToken) -> &'static str {
    match kind {
        TToken::Uses => "`uses`",
        TToken::LiteralString => "literal",
        TToken::Identifier => "identifier",
        TToken::Colon => "`:`",
        TToken::Semicolon => "`;`",
        TToken::Bar => "`|`",
        TToken::LParen => "`(`",
        TToken::RParen => "`)`",
        TToken::LCurly => "`{`",
        TToken::RCurly => "`}`",
        TToken::LBracket => "`[`",
        TToken::RBracket => "`]`",
        TToken::EOS => "end of input",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ast::Expr;

    #[test]
    fn smoketest() {
        let input = r#"
uses "calculator";
Expr: Term {("+" | "-") Term};
Term: Number | "(" Expr ")" | [Sign] Term;
"#;
        let def = parse(input).unwrap();
        assert_eq!(def.uses, "calculator");
        assert_eq!(def.productions.len(), 2);

        let expr = &def.productions[0];
        assert_eq!(expr.name, "Expr");
        assert_eq!(expr.name_span.start.line, 2);
        match &expr.expr {
            Expr::Sequence(items) => match &items[..] {
                [Expr::Identifier { name, .. }, Expr::Many(inner)] => {
                    assert_eq!(name, "Term");
                    assert!(matches!(&**inner, Expr::Sequence(items) if matches!(
                        &items[..],
                        [Expr::Paren(alt), Expr::Identifier { .. }]
                            if matches!(&**alt, Expr::Alternative(branches) if branches.len() == 2)
                    )));
                }
                items => panic!("unexpected items: {:?}", items),
            },
            expr => panic!("unexpected expr: {:?}", expr),
        }

        match &def.productions[1].expr {
            Expr::Alternative(branches) => {
                assert_eq!(branches.len(), 3);
                assert!(matches!(&branches[0], Expr::Identifier { name, .. } if name == "Number"));
                assert!(matches!(
                    &branches[2],
                    Expr::Sequence(items) if matches!(&items[0], Expr::Optional(..))
                ));
            }
            expr => panic!("unexpected expr: {:?}", expr),
        }
    }

    #[test]
    fn empty_grammar() {
        let def = parse("uses \"empty\";").unwrap();
        assert!(def.productions.is_empty());
    }

    #[test]
    fn missing_uses() {
        let err = parse("Program: A;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "1:1: unexpected identifier `Program`, expected `uses`"
        );
    }

    #[test]
    fn empty_sequence_is_rejected() {
        let err = parse("uses \"s\";\nProgram: A | ;").unwrap_err();
        assert_eq!(
            err.to_string(),
            "2:14: unexpected `;`, expected literal or identifier or `(` or `{` or `[`"
        );
    }

    #[test]
    fn unterminated_production() {
        let err = parse("uses \"s\";\nProgram: A").unwrap_err();
        assert!(matches!(
            err,
            ParseError::UnexpectedToken { ref found, ref expected, .. }
                if found == "end of input" && expected[..] == ["`;`"]
        ));
    }

    #[test]
    fn trailing_input() {
        let err = parse("uses \"s\";\nProgram: A;\n)").unwrap_err();
        assert_eq!(
            err.to_string(),
            "3:1: unexpected `)`, expected end of input"
        );
    }

    #[test]
    fn reader_is_generated_from_its_grammar() {
        let source = include_str!("syntax/rdgen.llg");
        let def = crate::grammar::Definition::from_source(source, scanner_def().unwrap()).unwrap();
        assert_eq!(parse(source).unwrap().uses, "rdgen");

        let names: Vec<&str> = def.terminals().iter().map(String::as_str).collect();
        assert_eq!(
            names,
            [
                "Uses",
                "LiteralString",
                "Identifier",
                "Colon",
                "Semicolon",
                "Bar",
                "LParen",
                "RParen",
                "LCurly",
                "RCurly",
                "LBracket",
                "RBracket",
            ]
        );

        let generated = include_str!("syntax/parser.rs");
        let code = crate::codegen::Codegen::new(&def).to_string();
        for line in code.lines().filter(|line| line.contains("fn ")) {
            assert!(generated.contains(line), "missing in parser.rs: {}", line);
        }
    }

    #[test]
    fn lexer_error() {
        let err = parse("uses \"s\";\nProgram: #;").unwrap_err();
        assert_eq!(err.to_string(), "2:10: unrecognized character");
    }
}
