//! Line comment skipping.

use super::Lexer;

impl<'a> Lexer<'a> {
    /// Skips a `//` comment through (but not including) the next newline,
    /// or through end-of-input if the comment is never closed by one.
    pub(super) fn skip_line_comment(&mut self) {
        debug_assert_eq!(self.cursor.current(), '/');
        debug_assert_eq!(self.cursor.peek(1), '/');
        self.cursor.advance();
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current() != '\n' {
            self.cursor.advance();
        }
    }
}
