use std::fmt;

/// The error reported by generated parsers when the current token cannot
/// start any of the expected constructs.
#[derive(Debug, thiserror::Error)]
#[error("unexpected token {:?}, expected {}", .found, expected_fn(.expected))]
pub struct SyntaxError<K: fmt::Debug, T: fmt::Debug> {
    /// The offending token, consumed from the input.
    pub found: T,
    /// The token kinds that would have been accepted.
    pub expected: Vec<K>,
}

fn expected_fn<K: fmt::Debug>(expected: &[K]) -> impl fmt::Display + '_ {
    struct ExpectedFn<'a, K>(&'a [K]);
    impl<K: fmt::Debug> fmt::Display for ExpectedFn<'_, K> {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.0 {
                [] => f.write_str("nothing"),
                [kind] => write!(f, "{:?}", kind),
                kinds => {
                    f.write_str("one of ")?;
                    for (i, kind) in kinds.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{:?}", kind)?;
                    }
                    Ok(())
                }
            }
        }
    }
    ExpectedFn(expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = SyntaxError::<char, &str> {
            found: "x",
            expected: vec!['a'],
        };
        assert_eq!(err.to_string(), "unexpected token \"x\", expected 'a'");

        let err = SyntaxError::<char, &str> {
            found: "x",
            expected: vec!['a', 'b'],
        };
        assert_eq!(err.to_string(), "unexpected token \"x\", expected one of 'a', 'b'");

        let err = SyntaxError::<char, &str> {
            found: "x",
            expected: vec![],
        };
        assert_eq!(err.to_string(), "unexpected token \"x\", expected nothing");
    }
}
