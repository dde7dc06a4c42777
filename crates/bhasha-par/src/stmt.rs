//! Statement parsing (spec.md §3 "Statement").

use bhasha_lex::TokenKind;
use bhasha_util::Span;

use crate::ast::{Block, Expression, Program, Statement};
use crate::precedence::bp;
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Option<Statement> {
        match self.current_kind() {
            TokenKind::Let => self.parse_variable_binding(),
            TokenKind::Return => self.parse_return(),
            TokenKind::While => self.parse_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Break => self.parse_break(),
            TokenKind::Continue => self.parse_continue(),
            TokenKind::Import => self.parse_import(),
            TokenKind::LBrace => self.parse_block().map(Statement::Block),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_variable_binding(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance(); // `ধরি`
        let (name, _) = self.expect_identifier("a variable name")?;
        let type_annotation = if *self.current_kind() == TokenKind::Colon {
            self.advance();
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        self.expect(TokenKind::Assign, "'='")?;
        let value = self.parse_expression(bp::MIN)?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Statement::VariableBinding {
            name,
            type_annotation,
            value,
            span: start,
        })
    }

    fn parse_return(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance();
        if *self.current_kind() == TokenKind::Semicolon {
            self.advance();
            return Some(Statement::Return {
                value: None,
                span: start,
            });
        }
        let value = self.parse_expression(bp::MIN)?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Statement::Return {
            value: Some(value),
            span: start,
        })
    }

    fn parse_while(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance();
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_expression(bp::MIN)?;
        self.expect(TokenKind::RParen, "')'")?;
        let body = self.parse_block()?;
        Some(Statement::While {
            condition,
            body,
            span: start,
        })
    }

    /// C-style `for (init; condition; update) { body }`. Any of the three
    /// clauses may be empty (spec.md §4.2 "For statement").
    fn parse_for(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance();
        self.expect(TokenKind::LParen, "'('")?;

        let init = if *self.current_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(Box::new(self.parse_for_clause()?))
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let condition = if *self.current_kind() == TokenKind::Semicolon {
            None
        } else {
            Some(self.parse_expression(bp::MIN)?)
        };
        self.expect(TokenKind::Semicolon, "';'")?;

        let update = if *self.current_kind() == TokenKind::RParen {
            None
        } else {
            Some(Box::new(self.parse_for_clause()?))
        };
        self.expect(TokenKind::RParen, "')'")?;

        let body = self.parse_block()?;
        Some(Statement::For {
            init,
            condition,
            update,
            body,
            span: start,
        })
    }

    /// A `for` init/update clause: a variable binding or an assignment/
    /// expression, parsed without consuming a trailing `;` (the caller owns
    /// the loop header's own semicolons).
    fn parse_for_clause(&mut self) -> Option<Statement> {
        let start = self.current_span();
        if *self.current_kind() == TokenKind::Let {
            self.advance();
            let (name, _) = self.expect_identifier("a variable name")?;
            let type_annotation = if *self.current_kind() == TokenKind::Colon {
                self.advance();
                Some(self.parse_type_annotation()?)
            } else {
                None
            };
            self.expect(TokenKind::Assign, "'='")?;
            let value = self.parse_expression(bp::MIN)?;
            return Some(Statement::VariableBinding {
                name,
                type_annotation,
                value,
                span: start,
            });
        }
        let expr = self.parse_expression(bp::MIN)?;
        self.finish_assignment_or_expr(expr, start)
    }

    fn parse_break(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance();
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Statement::Break { span: start })
    }

    fn parse_continue(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance();
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Statement::Continue { span: start })
    }

    fn parse_import(&mut self) -> Option<Statement> {
        let start = self.current_span();
        self.advance();
        let path = match self.current_kind().clone() {
            TokenKind::Str(s) => {
                self.advance();
                s
            }
            other => {
                self.error(format!(
                    "expected a string module path after import, found {other:?}"
                ));
                return None;
            }
        };
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(Statement::Import { path, span: start })
    }

    fn parse_expression_statement(&mut self) -> Option<Statement> {
        let start = self.current_span();
        let expr = self.parse_expression(bp::MIN)?;
        let stmt = self.finish_assignment_or_expr(expr, start)?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Some(stmt)
    }

    /// Shared tail of expression-statement and `for`-clause parsing: an
    /// already-parsed expression either becomes the left side of an `=`
    /// assignment or stands alone as an expression statement.
    fn finish_assignment_or_expr(&mut self, expr: Expression, start: Span) -> Option<Statement> {
        if *self.current_kind() == TokenKind::Assign {
            self.advance();
            let value = self.parse_expression(bp::MIN)?;
            return match expr {
                Expression::Identifier(name, _) => Some(Statement::Reassignment {
                    name,
                    value,
                    span: start,
                }),
                Expression::MemberAccess { object, member, .. } => {
                    Some(Statement::MemberReassignment {
                        object,
                        member,
                        value,
                        span: start,
                    })
                }
                Expression::Index {
                    collection, index, ..
                } => Some(Statement::IndexReassignment {
                    collection,
                    index,
                    value,
                    span: start,
                }),
                _ => {
                    self.error("left-hand side of '=' is not assignable");
                    None
                }
            };
        }
        Some(Statement::Expression {
            value: expr,
            span: start,
        })
    }

    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let start = self.current_span();
        self.expect(TokenKind::LBrace, "'{'")?;
        let mut statements = Vec::new();
        while *self.current_kind() != TokenKind::RBrace && *self.current_kind() != TokenKind::Eof
        {
            match self.parse_statement() {
                Some(stmt) => statements.push(stmt),
                None => self.synchronize(),
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Some(Block {
            statements,
            span: start,
        })
    }
}

/// Parses a whole program from source text, collecting diagnostics into
/// `handler` rather than failing fast (spec.md §4.2).
pub fn parse(source: &str, handler: &mut bhasha_util::Handler) -> Program {
    let mut parser = Parser::new(source, handler);
    parser.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bhasha_util::Handler;

    fn parse_ok(source: &str) -> Program {
        let mut handler = Handler::new();
        let program = parse(source, &mut handler);
        assert!(
            !handler.has_errors(),
            "unexpected parse errors: {:?}",
            handler.diagnostics()
        );
        program
    }

    #[test]
    fn parses_variable_binding_with_type() {
        let program = parse_ok("ধরি x: পূর্ণ = 5;");
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::VariableBinding {
                name,
                type_annotation,
                ..
            } => {
                assert_eq!(name, "x");
                assert!(type_annotation.is_some());
            }
            other => panic!("expected VariableBinding, got {other:?}"),
        }
    }

    #[test]
    fn parses_reassignment() {
        let program = parse_ok("x = 10;");
        assert!(matches!(
            &program.statements[0],
            Statement::Reassignment { name, .. } if name == "x"
        ));
    }

    #[test]
    fn parses_c_style_for_loop() {
        let program = parse_ok("জন্য (ধরি i = 0; i < 10; i = i + 1) { থামো; }");
        assert!(matches!(&program.statements[0], Statement::For { .. }));
    }

    #[test]
    fn parses_while_loop() {
        let program = parse_ok("যতক্ষণ (সত্য) { চালিয়ে_যাও; }");
        assert!(matches!(&program.statements[0], Statement::While { .. }));
    }

    #[test]
    fn parses_import() {
        let program = parse_ok("আমদানি \"utils\";");
        assert!(matches!(
            &program.statements[0],
            Statement::Import { path, .. } if path == "utils"
        ));
    }

    #[test]
    fn recovers_after_malformed_statement() {
        let mut handler = Handler::new();
        let program = parse("ধরি = 5; ধরি y = 10;", &mut handler);
        assert!(handler.has_errors());
        assert!(program
            .statements
            .iter()
            .any(|s| matches!(s, Statement::VariableBinding { name, .. } if name == "y")));
    }
}
