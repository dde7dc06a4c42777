//! Expression parsing via Pratt's top-down operator precedence algorithm
//! (spec.md §4.2 "Expression").
//!
//! [`Parser::parse_expression`] is the whole algorithm: parse a prefix term,
//! then repeatedly fold in postfix (`()`, `[]`, `.`) and infix operators
//! whose binding power clears `min_bp`. Recursing with the operator's right
//! binding power gives left-associativity for every binary operator here;
//! there is no right-associative operator in this grammar.

use bhasha_lex::TokenKind;

use crate::ast::{Block, Expression, Parameter, PrefixOperator, Statement};
use crate::precedence::{self, bp};
use crate::types::TypeTag;
use crate::Parser;

impl<'a> Parser<'a> {
    pub(crate) fn parse_expression(&mut self, min_bp: u8) -> Option<Expression> {
        let prefix = self.parse_prefix()?;
        let mut left = self.parse_postfix(prefix)?;

        loop {
            if *self.current_kind() == TokenKind::As {
                if bp::CAST < min_bp {
                    break;
                }
                self.advance();
                let target = self.parse_type_annotation()?;
                let span = left.span();
                left = Expression::TypeCast {
                    value: Box::new(left),
                    target,
                    span,
                };
                continue;
            }

            let (_, right_bp, operator) = match precedence::infix_binding_power(self.current_kind())
            {
                Some(triple) if triple.0 >= min_bp => triple,
                _ => break,
            };
            let span = left.span();
            self.advance();
            let right = self.parse_expression(right_bp)?;
            left = Expression::Infix {
                left: Box::new(left),
                operator,
                right: Box::new(right),
                span,
            };
        }

        Some(left)
    }

    /// Folds call, index and member-access chains onto `left`; these bind
    /// tighter than any infix operator, so they are resolved before the
    /// infix loop ever looks at the current token.
    fn parse_postfix(&mut self, mut left: Expression) -> Option<Expression> {
        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    let span = left.span();
                    self.advance();
                    let arguments = self.parse_expression_list(TokenKind::RParen)?;
                    left = Expression::Call {
                        function: Box::new(left),
                        arguments,
                        span,
                    };
                }
                TokenKind::LBracket => {
                    let span = left.span();
                    self.advance();
                    let index = self.parse_expression(bp::MIN)?;
                    self.expect(TokenKind::RBracket, "']'")?;
                    left = Expression::Index {
                        collection: Box::new(left),
                        index: Box::new(index),
                        span,
                    };
                }
                TokenKind::Dot => {
                    let span = left.span();
                    self.advance();
                    let (member, _) = self.expect_identifier("a member name")?;
                    left = Expression::MemberAccess {
                        object: Box::new(left),
                        member,
                        span,
                    };
                }
                _ => break,
            }
        }
        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_expression(bp::PREFIX)?;
                Some(Expression::Prefix {
                    operator: PrefixOperator::Negate,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Bang => {
                self.advance();
                let operand = self.parse_expression(bp::PREFIX)?;
                Some(Expression::Prefix {
                    operator: PrefixOperator::Not,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Tilde => {
                self.advance();
                let operand = self.parse_expression(bp::PREFIX)?;
                Some(Expression::Prefix {
                    operator: PrefixOperator::BitNot,
                    operand: Box::new(operand),
                    span,
                })
            }
            TokenKind::Int(text) => {
                self.advance();
                match text.parse::<i64>() {
                    Ok(value) => Some(Expression::IntegerLiteral(value, span)),
                    Err(_) => {
                        self.error(format!("integer literal '{text}' is out of range"));
                        None
                    }
                }
            }
            TokenKind::Str(text) => {
                self.advance();
                Some(Expression::StringLiteral(text, span))
            }
            TokenKind::True => {
                self.advance();
                Some(Expression::BooleanLiteral(true, span))
            }
            TokenKind::False => {
                self.advance();
                Some(Expression::BooleanLiteral(false, span))
            }
            TokenKind::Null => {
                self.advance();
                Some(Expression::NullLiteral(span))
            }
            TokenKind::Ident(name) => {
                self.advance();
                Some(Expression::Identifier(name, span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression(bp::MIN)?;
                self.expect(TokenKind::RParen, "')'")?;
                Some(inner)
            }
            TokenKind::If => self.parse_if_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_hash_literal(),
            TokenKind::StructLiteral | TokenKind::EnumLiteral => self.parse_struct_or_enum(),
            TokenKind::SelfRef => {
                self.advance();
                Some(Expression::SelfRef(span))
            }
            TokenKind::ParentRef => {
                self.advance();
                Some(Expression::ParentRef(span))
            }
            TokenKind::New => self.parse_new_expression(),
            ref kind if TypeTag::from_token(kind).is_some() => {
                let annotation = self.parse_type_annotation()?;
                Some(Expression::TypeAnnotation(annotation, span))
            }
            other => {
                self.error(format!("expected an expression, found {other:?}"));
                None
            }
        }
    }

    fn parse_if_expression(&mut self) -> Option<Expression> {
        let span = self.current_span();
        self.advance();
        self.expect(TokenKind::LParen, "'('")?;
        let condition = self.parse_expression(bp::MIN)?;
        self.expect(TokenKind::RParen, "')'")?;
        let consequence = self.parse_block()?;
        let alternative = if *self.current_kind() == TokenKind::Else {
            self.advance();
            if *self.current_kind() == TokenKind::If {
                let nested = self.parse_if_expression()?;
                let nested_span = nested.span();
                Some(Block {
                    statements: vec![Statement::Expression {
                        value: nested,
                        span: nested_span,
                    }],
                    span: nested_span,
                })
            } else {
                Some(self.parse_block()?)
            }
        } else {
            None
        };
        Some(Expression::If {
            condition: Box::new(condition),
            consequence,
            alternative,
            span,
        })
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        let span = self.current_span();
        self.advance();
        let name = if matches!(self.current_kind(), TokenKind::Ident(_)) {
            Some(self.expect_identifier("a function name")?.0)
        } else {
            None
        };
        self.expect(TokenKind::LParen, "'('")?;
        let parameters = self.parse_parameter_list()?;
        let return_type = if *self.current_kind() == TokenKind::Colon {
            self.advance();
            Some(self.parse_type_annotation()?)
        } else {
            None
        };
        let body = self.parse_block()?;
        Some(Expression::FunctionLiteral {
            name,
            parameters,
            return_type,
            body,
            span,
        })
    }

    fn parse_parameter_list(&mut self) -> Option<Vec<Parameter>> {
        let mut params = Vec::new();
        if *self.current_kind() == TokenKind::RParen {
            self.advance();
            return Some(params);
        }
        loop {
            let (name, _) = self.expect_identifier("a parameter name")?;
            let type_annotation = if *self.current_kind() == TokenKind::Colon {
                self.advance();
                Some(self.parse_type_annotation()?)
            } else {
                None
            };
            params.push(Parameter {
                name,
                type_annotation,
            });
            if *self.current_kind() == TokenKind::Comma {
                self.advance();
                continue;
            }
            break;
        }
        self.expect(TokenKind::RParen, "')'")?;
        Some(params)
    }

    fn parse_array_literal(&mut self) -> Option<Expression> {
        let span = self.current_span();
        self.advance();
        let elements = self.parse_expression_list(TokenKind::RBracket)?;
        Some(Expression::ArrayLiteral { elements, span })
    }

    fn parse_hash_literal(&mut self) -> Option<Expression> {
        let span = self.current_span();
        self.advance();
        let mut pairs = Vec::new();
        if *self.current_kind() == TokenKind::RBrace {
            self.advance();
            return Some(Expression::HashLiteral { pairs, span });
        }
        loop {
            let key = self.parse_expression(bp::MIN)?;
            self.expect(TokenKind::Colon, "':'")?;
            let value = self.parse_expression(bp::MIN)?;
            pairs.push((key, value));
            if *self.current_kind() == TokenKind::Comma {
                self.advance();
                continue;
            }
            break;
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Some(Expression::HashLiteral { pairs, span })
    }

    /// `কাঠামো`/`গণনা` share one entry point because both keywords are
    /// resolved the same way: parse the generic `name { ... }` shape first,
    /// then classify it. A struct whose field values are all bare type tags
    /// is a definition; anything else constructs a value (spec.md §3
    /// "struct-definition" / "struct-literal").
    fn parse_struct_or_enum(&mut self) -> Option<Expression> {
        let span = self.current_span();
        let is_enum = *self.current_kind() == TokenKind::EnumLiteral;
        self.advance();
        let (name, _) = self.expect_identifier("a name")?;

        if is_enum {
            if *self.current_kind() == TokenKind::LBrace {
                self.advance();
                let mut variants = Vec::new();
                if *self.current_kind() != TokenKind::RBrace {
                    loop {
                        let (variant, _) = self.expect_identifier("a variant name")?;
                        variants.push(variant);
                        if *self.current_kind() == TokenKind::Comma {
                            self.advance();
                            continue;
                        }
                        break;
                    }
                }
                self.expect(TokenKind::RBrace, "'}'")?;
                return Some(Expression::EnumDefinition {
                    name,
                    variants,
                    span,
                });
            }
            self.expect(TokenKind::Dot, "'.'")?;
            let (variant, _) = self.expect_identifier("a variant name")?;
            return Some(Expression::EnumValue {
                enum_name: name,
                variant,
                span,
            });
        }

        self.expect(TokenKind::LBrace, "'{'")?;
        let mut fields: Vec<(String, Expression)> = Vec::new();
        if *self.current_kind() != TokenKind::RBrace {
            loop {
                let (field_name, _) = self.expect_identifier("a field name")?;
                self.expect(TokenKind::Colon, "':'")?;
                let value = self.parse_expression(bp::MIN)?;
                fields.push((field_name, value));
                if *self.current_kind() == TokenKind::Comma {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;

        let is_definition = !fields.is_empty()
            && fields
                .iter()
                .all(|(_, value)| matches!(value, Expression::TypeAnnotation(_, _)));

        if is_definition {
            let fields = fields
                .into_iter()
                .map(|(field_name, value)| match value {
                    Expression::TypeAnnotation(annotation, _) => (field_name, annotation),
                    _ => unreachable!("classified as a definition above"),
                })
                .collect();
            Some(Expression::StructDefinition { name, fields, span })
        } else {
            Some(Expression::StructLiteral { name, fields, span })
        }
    }

    fn parse_new_expression(&mut self) -> Option<Expression> {
        let span = self.current_span();
        self.advance();
        let (class_name, _) = self.expect_identifier("a class name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::New {
            class_name,
            arguments,
            span,
        })
    }

    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut items = Vec::new();
        if *self.current_kind() == end {
            self.advance();
            return Some(items);
        }
        loop {
            items.push(self.parse_expression(bp::MIN)?);
            if *self.current_kind() == TokenKind::Comma {
                self.advance();
                continue;
            }
            break;
        }
        self.expect(end, "a closing delimiter")?;
        Some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::InfixOperator;
    use crate::stmt::parse;
    use bhasha_util::Handler;

    fn parse_single_expression(source: &str) -> Expression {
        let mut handler = Handler::new();
        let program = parse(source, &mut handler);
        assert!(
            !handler.has_errors(),
            "unexpected parse errors for {source:?}: {:?}",
            handler.diagnostics()
        );
        match program.statements.into_iter().next().expect("a statement") {
            Statement::Expression { value, .. } => value,
            other => panic!("expected an expression statement, got {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let expr = parse_single_expression("1 + 2 * 3;");
        match expr {
            Expression::Infix {
                operator: InfixOperator::Add,
                right,
                ..
            } => assert!(matches!(
                *right,
                Expression::Infix {
                    operator: InfixOperator::Multiply,
                    ..
                }
            )),
            other => panic!("expected a top-level Add, got {other:?}"),
        }
    }

    #[test]
    fn subtraction_is_left_associative() {
        let expr = parse_single_expression("10 - 2 - 3;");
        match expr {
            Expression::Infix {
                left,
                operator: InfixOperator::Subtract,
                right,
                ..
            } => {
                assert!(matches!(*right, Expression::IntegerLiteral(3, _)));
                assert!(matches!(
                    *left,
                    Expression::Infix {
                        operator: InfixOperator::Subtract,
                        ..
                    }
                ));
            }
            other => panic!("expected a top-level Subtract, got {other:?}"),
        }
    }

    #[test]
    fn cast_binds_tighter_than_additive() {
        let expr = parse_single_expression("1 + x রূপে পূর্ণ;");
        match expr {
            Expression::Infix {
                operator: InfixOperator::Add,
                right,
                ..
            } => assert!(matches!(*right, Expression::TypeCast { .. })),
            other => panic!("expected a top-level Add, got {other:?}"),
        }
    }

    #[test]
    fn parses_call_index_and_member_chain() {
        let expr = parse_single_expression("f(x)[0].field;");
        assert!(matches!(expr, Expression::MemberAccess { .. }));
    }

    #[test]
    fn parses_if_else_expression() {
        let expr = parse_single_expression("if (x) { 1; } else { 2; };");
        match expr {
            Expression::If { alternative, .. } => assert!(alternative.is_some()),
            other => panic!("expected an If expression, got {other:?}"),
        }
    }

    #[test]
    fn parses_function_literal_with_types() {
        let expr = parse_single_expression("কাজ যোগ(a: পূর্ণ, b: পূর্ণ) : পূর্ণ { ফেরত a + b; };");
        match expr {
            Expression::FunctionLiteral {
                name, parameters, ..
            } => {
                assert_eq!(name.as_deref(), Some("যোগ"));
                assert_eq!(parameters.len(), 2);
            }
            other => panic!("expected a FunctionLiteral, got {other:?}"),
        }
    }

    #[test]
    fn struct_with_type_fields_is_a_definition() {
        let expr = parse_single_expression("কাঠামো বিন্দু { x: পূর্ণ, y: পূর্ণ };");
        assert!(matches!(expr, Expression::StructDefinition { .. }));
    }

    #[test]
    fn struct_with_value_fields_is_a_literal() {
        let expr = parse_single_expression("কাঠামো বিন্দু { x: 1, y: 2 };");
        assert!(matches!(expr, Expression::StructLiteral { .. }));
    }

    #[test]
    fn enum_with_braces_is_a_definition() {
        let expr = parse_single_expression("গণনা রং { লাল, সবুজ, নীল };");
        assert!(matches!(expr, Expression::EnumDefinition { .. }));
    }

    #[test]
    fn enum_with_dot_is_a_value() {
        let expr = parse_single_expression("গণনা রং.লাল;");
        assert!(matches!(expr, Expression::EnumValue { .. }));
    }
}

#[cfg(test)]
mod proptests {
    use crate::ast::{Expression, InfixOperator, Statement};
    use crate::stmt::parse;
    use bhasha_util::Handler;
    use quickcheck::TestResult;
    use quickcheck_macros::quickcheck;

    /// A left-to-right chain of `-` must associate left: `a - b - c` is
    /// `(a - b) - c`, never `a - (b - c)` (spec.md §8 "Left-associativity").
    #[quickcheck]
    fn subtraction_chain_is_left_associative(raw: Vec<i32>) -> TestResult {
        let values: Vec<i64> = raw.iter().map(|v| v.unsigned_abs() as i64).collect();
        if values.len() < 2 || values.len() > 8 {
            return TestResult::discard();
        }

        let source = values
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" - ")
            + ";";
        let mut handler = Handler::new();
        let program = parse(&source, &mut handler);
        if handler.has_errors() {
            return TestResult::failed();
        }
        let expr = match program.statements.into_iter().next() {
            Some(Statement::Expression { value, .. }) => value,
            _ => return TestResult::failed(),
        };

        let mut collected = Vec::new();
        let mut node = expr;
        loop {
            match node {
                Expression::Infix {
                    left,
                    operator: InfixOperator::Subtract,
                    right,
                    ..
                } => {
                    match *right {
                        Expression::IntegerLiteral(v, _) => collected.push(v),
                        _ => return TestResult::failed(),
                    }
                    node = *left;
                }
                Expression::IntegerLiteral(v, _) => {
                    collected.push(v);
                    break;
                }
                _ => return TestResult::failed(),
            }
        }
        collected.reverse();
        TestResult::from_bool(collected == values)
    }
}
