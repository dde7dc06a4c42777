//! Symbol table and scope resolution (spec.md §4.3).
//!
//! The table is a stack of frames ("ribs"), the outermost being the global
//! scope. Resolving a name walks outward from the current frame; a name
//! found in an enclosing *function* frame is captured as a free variable
//! rather than returned directly, which is the entire closure-capture
//! mechanism, and it lives here rather than in the compiler (spec.md §4.3
//! "resolve").

mod table;

pub use table::{Scope, Symbol, SymbolTable};
