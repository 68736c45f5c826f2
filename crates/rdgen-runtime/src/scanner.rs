//! Token sources.

use std::fmt;

/// A token stream with one token of lookahead.
///
/// The scanner always has a current token. Once the input is exhausted, it
/// keeps reporting the end-of-stream kind.
pub trait Scanner {
    /// The kind of tokens, as matched by the parser.
    type Kind: Copy + PartialEq + fmt::Debug;

    /// The token value handed to the visitor.
    type Token: fmt::Debug;

    /// Return the kind of the current token.
    fn kind(&self) -> Self::Kind;

    /// Move to the next token, returning the current one.
    fn advance(&mut self) -> Self::Token;
}

impl<S: ?Sized + Scanner> Scanner for &mut S {
    type Kind = S::Kind;
    type Token = S::Token;

    #[inline]
    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }

    #[inline]
    fn advance(&mut self) -> Self::Token {
        (**self).advance()
    }
}

impl<S: ?Sized + Scanner> Scanner for Box<S> {
    type Kind = S::Kind;
    type Token = S::Token;

    #[inline]
    fn kind(&self) -> Self::Kind {
        (**self).kind()
    }

    #[inline]
    fn advance(&mut self) -> Self::Token {
        (**self).advance()
    }
}
