//! Integer literal lexing, with Bengali-digit folding (spec.md §4.1, §6.4).

use super::Lexer;
use crate::token::{Token, TokenKind};
use crate::unicode::{fold_digit, is_source_digit};

impl<'a> Lexer<'a> {
    /// Scans a maximal run of digits from either recognised digit block and
    /// folds every scalar to its ASCII counterpart before emitting the
    /// token, so the parser only ever sees base-10 ASCII digit strings.
    ///
    /// Only integer literals are produced here: the core's lexical grammar
    /// does not recognise floating-point literals (spec.md §4.1, §9).
    pub(super) fn lex_number(&mut self) -> Token {
        let mut folded = String::new();
        while is_source_digit(self.cursor.current()) {
            let c = self.cursor.advance();
            folded.push(fold_digit(c).expect("is_source_digit implies fold_digit"));
        }
        self.make(TokenKind::Int(folded))
    }
}

#[cfg(test)]
mod tests {
    use super::super::Lexer;
    use crate::token::TokenKind;
    use bhasha_util::Handler;

    fn lex_one(source: &str) -> TokenKind {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        lexer.next_token().kind
    }

    #[test]
    fn ascii_digits() {
        assert_eq!(lex_one("12345"), TokenKind::Int("12345".to_string()));
    }

    #[test]
    fn bengali_digits_fold_to_ascii() {
        assert_eq!(lex_one("১২৩"), TokenKind::Int("123".to_string()));
    }

    #[test]
    fn mixed_digit_blocks_fold_uniformly() {
        assert_eq!(lex_one("1২3"), TokenKind::Int("123".to_string()));
    }
}
