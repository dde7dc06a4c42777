//! Operator and punctuation disambiguation (spec.md §4.1).
//!
//! Every multi-character operator is resolved with exactly one scalar of
//! lookahead against a closed table.

use super::Lexer;
use crate::token::TokenKind;

impl<'a> Lexer<'a> {
    /// Returns `Some(kind)` and advances past the matched operator, or `None`
    /// if the current scalar does not start any recognised operator
    /// (the caller then treats it as an illegal character).
    pub(super) fn lex_operator(&mut self) -> Option<TokenKind> {
        use TokenKind::*;

        let c = self.cursor.current();
        let kind = match c {
            '=' => {
                self.cursor.advance();
                match self.cursor.current() {
                    '=' => {
                        self.cursor.advance();
                        Eq
                    }
                    '>' => {
                        self.cursor.advance();
                        Arrow
                    }
                    _ => Assign,
                }
            }
            '<' => {
                self.cursor.advance();
                match self.cursor.current() {
                    '=' => {
                        self.cursor.advance();
                        LtEq
                    }
                    '<' => {
                        self.cursor.advance();
                        Shl
                    }
                    _ => Lt,
                }
            }
            '>' => {
                self.cursor.advance();
                match self.cursor.current() {
                    '=' => {
                        self.cursor.advance();
                        GtEq
                    }
                    '>' => {
                        self.cursor.advance();
                        Shr
                    }
                    _ => Gt,
                }
            }
            '!' => {
                self.cursor.advance();
                if self.cursor.current() == '=' {
                    self.cursor.advance();
                    NotEq
                } else {
                    Bang
                }
            }
            '&' => {
                self.cursor.advance();
                if self.cursor.current() == '&' {
                    self.cursor.advance();
                    AmpAmp
                } else {
                    Amp
                }
            }
            '|' => {
                self.cursor.advance();
                if self.cursor.current() == '|' {
                    self.cursor.advance();
                    PipePipe
                } else {
                    Pipe
                }
            }
            '+' => self.single(Plus),
            '-' => self.single(Minus),
            '*' => self.single(Star),
            '/' => self.single(Slash),
            '%' => self.single(Percent),
            '^' => self.single(Caret),
            '~' => self.single(Tilde),
            '(' => self.single(LParen),
            ')' => self.single(RParen),
            '{' => self.single(LBrace),
            '}' => self.single(RBrace),
            '[' => self.single(LBracket),
            ']' => self.single(RBracket),
            ',' => self.single(Comma),
            ';' => self.single(Semicolon),
            ':' => self.single(Colon),
            '.' => self.single(Dot),
            _ => return None,
        };
        Some(kind)
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.cursor.advance();
        kind
    }
}
