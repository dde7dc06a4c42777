//! Runtime error kinds (spec.md §7 "Run-time"), the single-line message a
//! failing run prints before terminating (spec.md §6.6 "Diagnostics").

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RuntimeError {
    #[error("stack overflow")]
    StackOverflow,

    #[error("stack underflow")]
    StackUnderflow,

    #[error("frame overflow")]
    FrameOverflow,

    #[error("unknown opcode {0}")]
    UnknownOpcode(u8),

    #[error("type error: {0}")]
    TypeError(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("modulo by zero")]
    ModuloByZero,

    #[error("shift amount out of range")]
    ShiftAmountOutOfRange,

    #[error("wrong argument count: expected {expected}, got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("calling non-function value of type {0}")]
    NotCallable(&'static str),

    #[error("unhashable value of type {0} used as hash key")]
    UnhashableKey(&'static str),

    #[error("failed type cast from {from} to {to}")]
    FailedCast { from: &'static str, to: String },

    #[error("failed type assertion: expected {expected}, got {got}")]
    FailedAssertion { expected: String, got: String },

    #[error("{0}")]
    Builtin(String),
}
