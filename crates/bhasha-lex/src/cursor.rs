/// A cursor over the source text's Unicode scalars.
///
/// Indexes by scalar instead of by byte: source text mixes multi-byte
/// Bengali letters and combining marks with ASCII, and a byte cursor would
/// let a lookahead land mid-scalar.
pub struct Cursor {
    scalars: Vec<char>,
    position: usize,
    line: u32,
    column: u32,
}

impl Cursor {
    pub fn new(source: &str) -> Self {
        Self {
            scalars: source.chars().collect(),
            position: 0,
            line: 0,
            column: 0,
        }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.scalars.len()
    }

    /// Current scalar, or `'\0'` at end of input.
    pub fn current(&self) -> char {
        self.peek(0)
    }

    /// Scalar `offset` positions ahead of the current one (0 = current).
    pub fn peek(&self, offset: usize) -> char {
        self.scalars
            .get(self.position + offset)
            .copied()
            .unwrap_or('\0')
    }

    /// Advances past the current scalar, updating line/column.
    pub fn advance(&mut self) -> char {
        let c = self.current();
        if c != '\0' {
            self.position += 1;
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
        c
    }

    /// The scalars from `start` (inclusive) up to the current position
    /// (exclusive), collected back into a `String`.
    pub fn slice_from(&self, start: usize) -> String {
        self.scalars[start..self.position].iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_line_and_column_over_newline() {
        let mut c = Cursor::new("ab\ncd");
        for _ in 0..3 {
            c.advance();
        }
        assert_eq!(c.line(), 1);
        assert_eq!(c.column(), 0);
        assert_eq!(c.current(), 'c');
    }

    #[test]
    fn slice_from_collects_multibyte_scalars() {
        let mut c = Cursor::new("ধরি x");
        let start = c.position();
        while c.current() != ' ' {
            c.advance();
        }
        assert_eq!(c.slice_from(start), "ধরি");
    }
}
