//! Identifier and keyword lexing.

use super::Lexer;
use crate::token::{keyword_from_text, Token, TokenKind};
use crate::unicode::is_ident_continue;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword (spec.md §4.1 "Identifier rule").
    ///
    /// The caller has already confirmed the current scalar is a valid
    /// identifier-start scalar; this scans the maximal continuation run and
    /// looks the resulting text up in the fixed keyword table.
    pub(super) fn lex_identifier(&mut self) -> Token {
        while is_ident_continue(self.cursor.current()) {
            self.cursor.advance();
        }

        let text = self.cursor.slice_from(self.token_start);
        let kind = keyword_from_text(&text).unwrap_or(TokenKind::Ident(text));
        self.make(kind)
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
    fn plain_identifier() {
        assert_eq!(lex_one("yog"), TokenKind::Ident("yog".to_string()));
    }

    #[test]
    fn bengali_identifier() {
        assert_eq!(lex_one("যোগফল"), TokenKind::Ident("যোগফল".to_string()));
    }

    #[test]
    fn keyword_dhori_is_let() {
        assert_eq!(lex_one("ধরি"), TokenKind::Let);
    }

    #[test]
    fn identifier_with_digits_and_underscore() {
        assert_eq!(
            lex_one("x_১২৩"),
            TokenKind::Ident("x_১২৩".to_string())
        );
    }
}
