//! The bytecode virtual machine (spec.md §4.7 "Execution model").
//!
//! Consumes the `Bytecode` a compiler produces and runs it to completion
//! or to the first `RuntimeError`. Holds no source-location state, unlike
//! compile diagnostics, a runtime failure has no line/column to report
//! (spec.md §6.6).

mod builtins;
mod cast;
mod error;
mod frame;
mod json;
mod vm;

pub use error::RuntimeError;
pub use vm::{new_globals_store, Bytecode, Vm, GLOBALS_SIZE, MAX_FRAMES, STACK_SIZE};

/// Re-exported for callers that want to pre-populate a persistent globals
/// store without reaching into `bhasha_value` themselves.
pub use bhasha_value::Value;
