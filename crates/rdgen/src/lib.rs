//! An LL(1) parser generator emitting recursive-descent parsers.

pub mod analysis;
pub mod build;
pub mod codegen;
pub mod grammar;
pub mod scanner;
pub mod syntax;
pub mod translate;
pub mod types;
pub mod util;
