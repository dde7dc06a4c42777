mod comment;
mod identifier;
mod number;
mod operator;
mod string;

use bhasha_util::{Handler, Span};

use crate::cursor::Cursor;
use crate::token::{Token, TokenKind};

/// Scans Bengali-keyword source text into a stream of [`Token`]s.
///
/// One lexer instance is consumed left-to-right via [`Lexer::next_token`];
/// after the last meaningful token it returns [`TokenKind::Eof`] forever
/// (spec.md §4.1), which lets the parser's two-token lookahead run past the
/// end of input without a special case.
pub struct Lexer<'a> {
    cursor: Cursor,
    handler: &'a mut Handler,
    /// Scalar offset of the token currently being scanned, set by
    /// [`Lexer::next_token`] before dispatch so submodules can slice the
    /// literal text without threading the start position through every call.
    token_start: usize,
    token_start_span: Span,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_span: Span::default(),
        }
    }

    fn make(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.token_start_span)
    }

    /// Reports a diagnostic through the lexer's handler. Exposed so the
    /// parser (which owns the lexer and therefore has no independent access
    /// to the handler) can feed errors into the same accumulator.
    pub fn report_error(&mut self, span: Span, message: impl Into<String>) {
        self.handler.error(span, message);
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.cursor.current() {
                ' ' | '\t' | '\n' | '\r' => {
                    self.cursor.advance();
                }
                '/' if self.cursor.peek(1) == '/' => self.skip_line_comment(),
                _ => break,
            }
        }
    }

    /// Produces the next token, advancing past it.
    pub fn next_token(&mut self) -> Token {
        self.skip_trivia();

        self.token_start = self.cursor.position();
        self.token_start_span = Span::new(self.cursor.line(), self.cursor.column());

        let c = self.cursor.current();
        if c == '\0' {
            return self.make(TokenKind::Eof);
        }

        if crate::unicode::is_ident_start(c) {
            return self.lex_identifier();
        }
        if crate::unicode::is_source_digit(c) {
            return self.lex_number();
        }
        if c == '"' {
            return self.lex_string();
        }
        if let Some(kind) = self.lex_operator() {
            return self.make(kind);
        }

        let illegal = c.to_string();
        self.cursor.advance();
        self.handler.error(
            self.token_start_span,
            format!("unrecognised character '{illegal}'"),
        );
        self.make(TokenKind::Illegal(illegal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(source: &str) -> Vec<TokenKind> {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new(source, &mut handler);
        let mut out = Vec::new();
        loop {
            let tok = lexer.next_token();
            let done = tok.kind == TokenKind::Eof;
            out.push(tok.kind);
            if done {
                break;
            }
        }
        out
    }

    #[test]
    fn tokenises_a_let_binding() {
        let kinds = tokens("ধরি x = 5;");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Let,
                TokenKind::Ident("x".to_string()),
                TokenKind::Assign,
                TokenKind::Int("5".to_string()),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn eof_is_returned_indefinitely() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("", &mut handler);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        assert_eq!(lexer.next_token().kind, TokenKind::Eof);
    }

    #[test]
    fn line_comment_is_skipped() {
        let kinds = tokens("5 // a comment\n6");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Int("5".to_string()),
                TokenKind::Int("6".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn token_records_line_and_column_of_first_scalar() {
        let mut handler = Handler::new();
        let mut lexer = Lexer::new("ab ধরি", &mut handler);
        let first = lexer.next_token();
        assert_eq!(first.span.line, 0);
        assert_eq!(first.span.column, 0);
        let second = lexer.next_token();
        assert_eq!(second.span.column, 3);
    }
}
