//! Lookahead cursor used by generated parsers.

use crate::{error::SyntaxError, scanner::Scanner};

/// Wraps a scanner and offers the primitive operations of a predictive parser.
#[derive(Debug)]
pub struct Input<S> {
    scanner: S,
}

impl<S: Scanner> Input<S> {
    pub fn new(scanner: S) -> Self {
        Self { scanner }
    }

    /// The kind of the lookahead token.
    #[inline]
    pub fn kind(&self) -> S::Kind {
        self.scanner.kind()
    }

    #[inline]
    pub fn is(&self, kind: S::Kind) -> bool {
        self.scanner.kind() == kind
    }

    #[inline]
    pub fn is_any(&self, kinds: &[S::Kind]) -> bool {
        let current = self.scanner.kind();
        kinds.iter().any(|kind| *kind == current)
    }

    /// Consume the lookahead token unconditionally.
    #[inline]
    pub fn bump(&mut self) -> S::Token {
        self.scanner.advance()
    }

    /// Consume the lookahead token if it is of the specified kind.
    pub fn expect(&mut self, kind: S::Kind) -> Result<S::Token, SyntaxError<S::Kind, S::Token>> {
        if self.is(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(&[kind]))
        }
    }

    /// Build an error reporting the lookahead token, which is consumed.
    pub fn error(&mut self, expected: &[S::Kind]) -> SyntaxError<S::Kind, S::Token> {
        SyntaxError {
            found: self.bump(),
            expected: expected.to_vec(),
        }
    }

    pub fn into_inner(self) -> S {
        self.scanner
    }
}
