//! Programmatic compile-time error kinds (spec.md §7 "Compile-time"), paired
//! with a plain-string rendering fed into the shared [`bhasha_util::Handler`]
//! the way `faxc-util::error` pairs a `thiserror` enum with user-facing text.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompileError {
    #[error("undefined identifier '{0}'")]
    UndefinedIdentifier(String),

    #[error("cannot reassign builtin '{0}'")]
    ReassignedBuiltin(String),

    #[error("'{0}' outside any loop")]
    LoopControlOutsideLoop(&'static str),

    #[error("malformed type annotation")]
    MalformedTypeAnnotation,

    #[error("cannot reassign a captured variable '{0}'")]
    ReassignedCapturedVariable(String),

    #[error("member/index assignment is not executable in the core: {0}")]
    UnsupportedMutation(&'static str),
}
