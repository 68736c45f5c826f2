// This file is automatically generated by rdgen.
// Do not edit it directly.

#[allow(unused_imports)]
use ::rdgen_runtime::_private as __rt;

/// The kinds of tokens recognized by the parser.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TToken {
    #[doc = " `\"uses\"`"]
    Uses,
    #[doc = " /\"([^\"\\\\]|\\\\.)*\"/"]
    LiteralString,
    #[doc = " /$$XID_Start $$XID_Continue*/"]
    Identifier,
    #[doc = " `\":\"`"]
    Colon,
    #[doc = " `\";\"`"]
    Semicolon,
    #[doc = " `\"|\"`"]
    Bar,
    #[doc = " `\"(\"`"]
    LParen,
    #[doc = " `\")\"`"]
    RParen,
    #[doc = " `\"{\"`"]
    LCurly,
    #[doc = " `\"}\"`"]
    RCurly,
    #[doc = " `\"[\"`"]
    LBracket,
    #[doc = " `\"]\"`"]
    RBracket,
    /// End of input.
    EOS,
}

impl TToken {
    /// Return the text of a literal token.
    #[allow(unreachable_patterns)]
    pub fn literal(self) -> Option<&'static str> {
        match self {
            Self::Uses => Some("uses"),
            Self::Colon => Some(":"),
            Self::Semicolon => Some(";"),
            Self::Bar => Some("|"),
            Self::LParen => Some("("),
            Self::RParen => Some(")"),
            Self::LCurly => Some("{"),
            Self::RCurly => Some("}"),
            Self::LBracket => Some("["),
            Self::RBracket => Some("]"),
            _ => None,
        }
    }

    /// Find the literal token with the specified text.
    #[allow(unreachable_patterns)]
    pub fn from_literal(text: &str) -> Option<Self> {
        match text {
            "uses" => Some(Self::Uses),
            ":" => Some(Self::Colon),
            ";" => Some(Self::Semicolon),
            "|" => Some(Self::Bar),
            "(" => Some(Self::LParen),
            ")" => Some(Self::RParen),
            "{" => Some(Self::LCurly),
            "}" => Some(Self::RCurly),
            "[" => Some(Self::LBracket),
            "]" => Some(Self::RBracket),
            _ => None,
        }
    }
}

/// The callbacks invoked when the parser recognizes a production.
#[allow(non_camel_case_types)]
pub trait Visitor {
    type Token;
    type Definition;
    type Production;
    type Expr;
    type Sequence;
    type Factor;

    /// `Definition: Uses LiteralString Semicolon {Production}`
    fn visit_definition(&mut self, a1: Self::Token, a2: Self::Token, a3: Self::Token, a4: Vec<Self::Production>) -> Self::Definition;

    /// `Production: Identifier Colon Expr Semicolon`
    fn visit_production(&mut self, a1: Self::Token, a2: Self::Token, a3: Self::Expr, a4: Self::Token) -> Self::Production;

    /// `Expr: Sequence {Bar Sequence}`
    fn visit_expr(&mut self, a1: Self::Sequence, a2: Vec<(Self::Token, Self::Sequence)>) -> Self::Expr;

    /// `Sequence: Factor {Factor}`
    fn visit_sequence(&mut self, a1: Self::Factor, a2: Vec<Self::Factor>) -> Self::Sequence;

    /// `Factor: LiteralString`
    fn visit_factor1(&mut self, a: Self::Token) -> Self::Factor;

    /// `Factor: Identifier`
    fn visit_factor2(&mut self, a: Self::Token) -> Self::Factor;

    /// `Factor: LParen Expr RParen`
    fn visit_factor3(&mut self, a1: Self::Token, a2: Self::Expr, a3: Self::Token) -> Self::Factor;

    /// `Factor: LCurly Expr RCurly`
    fn visit_factor4(&mut self, a1: Self::Token, a2: Self::Expr, a3: Self::Token) -> Self::Factor;

    /// `Factor: LBracket Expr RBracket`
    fn visit_factor5(&mut self, a1: Self::Token, a2: Self::Expr, a3: Self::Token) -> Self::Factor;
}

/// Parse the whole input as `Definition`.
pub fn parse_definition<S, V>(scanner: S, visitor: &mut V) -> Result<V::Definition, __rt::SyntaxError<TToken, S::Token>>
where
    S: __rt::Scanner<Kind = TToken>,
    V: Visitor<Token = S::Token> + ?Sized,
{
    let mut parser = Parser {
        input: __rt::Input::new(scanner),
        visitor,
    };
    let result = parser.definition()?;
    parser.input.expect(TToken::EOS)?;
    Ok(result)
}

struct Parser<'v, S, V: ?Sized> {
    input: __rt::Input<S>,
    visitor: &'v mut V,
}

#[allow(dead_code, unused_mut)]
impl<S, V> Parser<'_, S, V>
where
    S: __rt::Scanner<Kind = TToken>,
    V: Visitor<Token = S::Token> + ?Sized,
{
    fn definition(&mut self) -> Result<V::Definition, __rt::SyntaxError<TToken, S::Token>> {
        let a1 = self.input.expect(TToken::Uses)?;
        let a2 = self.input.expect(TToken::LiteralString)?;
        let a3 = self.input.expect(TToken::Semicolon)?;
        let mut a4 = Vec::new();
        while self.input.is(TToken::Identifier) {
            let t1 = self.production()?;
            a4.push(t1);
        }
        Ok(self.visitor.visit_definition(a1, a2, a3, a4))
    }

    fn production(&mut self) -> Result<V::Production, __rt::SyntaxError<TToken, S::Token>> {
        let a1 = self.input.expect(TToken::Identifier)?;
        let a2 = self.input.expect(TToken::Colon)?;
        let a3 = self.expr()?;
        let a4 = self.input.expect(TToken::Semicolon)?;
        Ok(self.visitor.visit_production(a1, a2, a3, a4))
    }

    fn expr(&mut self) -> Result<V::Expr, __rt::SyntaxError<TToken, S::Token>> {
        let a1 = self.sequence()?;
        let mut a2 = Vec::new();
        while self.input.is(TToken::Bar) {
            let t1 = {
                let t2 = self.input.expect(TToken::Bar)?;
                let t3 = self.sequence()?;
                (t2, t3)
            };
            a2.push(t1);
        }
        Ok(self.visitor.visit_expr(a1, a2))
    }

    fn sequence(&mut self) -> Result<V::Sequence, __rt::SyntaxError<TToken, S::Token>> {
        let a1 = self.factor()?;
        let mut a2 = Vec::new();
        while self.input.is_any(&[TToken::LiteralString, TToken::Identifier, TToken::LParen, TToken::LCurly, TToken::LBracket]) {
            let t1 = self.factor()?;
            a2.push(t1);
        }
        Ok(self.visitor.visit_sequence(a1, a2))
    }

    fn factor(&mut self) -> Result<V::Factor, __rt::SyntaxError<TToken, S::Token>> {
        if self.input.is(TToken::LiteralString) {
            let a = self.input.expect(TToken::LiteralString)?;
            Ok(self.visitor.visit_factor1(a))
        } else if self.input.is(TToken::Identifier) {
            let a = self.input.expect(TToken::Identifier)?;
            Ok(self.visitor.visit_factor2(a))
        } else if self.input.is(TToken::LParen) {
            let a1 = self.input.expect(TToken::LParen)?;
            let a2 = self.expr()?;
            let a3 = self.input.expect(TToken::RParen)?;
            Ok(self.visitor.visit_factor3(a1, a2, a3))
        } else if self.input.is(TToken::LCurly) {
            let a1 = self.input.expect(TToken::LCurly)?;
            let a2 = self.expr()?;
            let a3 = self.input.expect(TToken::RCurly)?;
            Ok(self.visitor.visit_factor4(a1, a2, a3))
        } else if self.input.is(TToken::LBracket) {
            let a1 = self.input.expect(TToken::LBracket)?;
            let a2 = self.expr()?;
            let a3 = self.input.expect(TToken::RBracket)?;
            Ok(self.visitor.visit_factor5(a1, a2, a3))
        } else {
            Err(self.input.error(&[TToken::LiteralString, TToken::Identifier, TToken::LParen, TToken::LCurly, TToken::LBracket]))
        }
    }
}
