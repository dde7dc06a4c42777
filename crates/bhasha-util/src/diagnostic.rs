use std::fmt;

use crate::Span;

/// Diagnostic severity. The core only ever emits `Error` (spec.md §7), but a
/// `Warning` variant is kept so host lint tooling can reuse this type without
/// widening it later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single compile-time diagnostic: `[Line L, Col C] message` (spec.md §6.6).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub span: Span,
    pub message: String,
}

impl Diagnostic {
    pub fn error(span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            span,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.span, self.message)
    }
}

/// Accumulates diagnostics across a compile (spec.md §4.2: "Errors are
/// accumulated, never thrown"). Shared by the lexer, parser and compiler so a
/// host sees one ordered list regardless of which stage raised what.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn error(&mut self, span: Span, message: impl Into<String>) {
        self.report(Diagnostic::error(span, message));
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_line_col_prefix() {
        let d = Diagnostic::error(Span::new(2, 4), "unexpected token");
        assert_eq!(d.to_string(), "[Line 3, Col 5] unexpected token");
    }

    #[test]
    fn handler_accumulates_without_throwing() {
        let mut h = Handler::new();
        assert!(!h.has_errors());
        h.error(Span::new(0, 0), "first");
        h.error(Span::new(1, 0), "second");
        assert!(h.has_errors());
        assert_eq!(h.diagnostics().len(), 2);
    }
}
