//! Runtime support for the parsers generated by `rdgen`.

pub mod error;
pub mod input;
pub mod scanner;

pub use crate::{error::SyntaxError, input::Input, scanner::Scanner};

// internally used by codegen.
#[doc(hidden)]
pub mod _private {
    pub use crate::{error::SyntaxError, input::Input, scanner::Scanner};
}
