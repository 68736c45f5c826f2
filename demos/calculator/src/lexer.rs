use crate::parser::TToken;
use logos::Logos;
use std::{mem, ops::Range};

// 入力の字句
#[derive(Debug, Copy, Clone, Logos, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
enum Token {
    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Num,
}

impl Token {
    fn kind(self) -> TToken {
        match self {
            Self::LParen => TToken::LParen,
            Self::RParen => TToken::RParen,
            Self::Plus => TToken::Plus,
            Self::Minus => TToken::Dash,
            Self::Star => TToken::Star,
            Self::Slash => TToken::Slash,
            Self::Num => TToken::Number,
        }
    }
}

/// A token handed to the parser, with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme<'source> {
    pub kind: TToken,
    pub text: &'source str,
    pub span: Range<usize>,
}

/// Feeds the generated parser from a `logos` lexer.
pub struct TokenStream<'source> {
    lexer: logos::Lexer<'source, Token>,
    current: Lexeme<'source>,
}

impl<'source> TokenStream<'source> {
    pub fn new(input: &'source str) -> Self {
        let mut lexer = Token::lexer(input);
        let current = next_lexeme(&mut lexer);
        Self { lexer, current }
    }
}

fn next_lexeme<'source>(lexer: &mut logos::Lexer<'source, Token>) -> Lexeme<'source> {
    let kind = match lexer.next() {
        Some(Ok(token)) => token.kind(),
        Some(Err(())) => TToken::Unknown,
        None => {
            let end = lexer.source().len();
            return Lexeme {
                kind: TToken::EOS,
                text: "",
                span: end..end,
            };
        }
    };
    Lexeme {
        kind,
        text: lexer.slice(),
        span: lexer.span(),
    }
}

impl<'source> rdgen_runtime::Scanner for TokenStream<'source> {
    type Kind = TToken;
    type Token = Lexeme<'source>;

    fn kind(&self) -> TToken {
        self.current.kind
    }

    fn advance(&mut self) -> Lexeme<'source> {
        let next = next_lexeme(&mut self.lexer);
        tracing::trace!("next token {:?}", next);
        mem::replace(&mut self.current, next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rdgen_runtime::Scanner as _;

    #[test]
    fn tokens() {
        let mut tokens = TokenStream::new("(1.5 + x)");
        let mut kinds = vec![];
        while tokens.kind() != TToken::EOS {
            kinds.push(tokens.advance().kind);
        }
        assert_eq!(
            kinds,
            [
                TToken::LParen,
                TToken::Number,
                TToken::Plus,
                TToken::Unknown,
                TToken::RParen,
            ]
        );
        assert_eq!(
            tokens.advance(),
            Lexeme {
                kind: TToken::EOS,
                text: "",
                span: 9..9,
            }
        );
    }
}
