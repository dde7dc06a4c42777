//! Shared foundation types for the Bhasha compiler pipeline.
//!
//! Every stage (lexer, parser, compiler) reports errors through the same
//! [`Diagnostic`]/[`Handler`] pair so a host can print one uniform error list
//! regardless of which stage produced it. [`IndexVec`] backs the symbol
//! table's scope stack with typed, non-interchangeable indices.

mod diagnostic;
mod index_vec;
mod span;

pub use diagnostic::{Diagnostic, Handler, Severity};
pub use index_vec::{Idx, IndexVec};
pub use span::Span;
