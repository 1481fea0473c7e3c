//! Expression parsing using Pratt parsing (top-down operator precedence).
//!
//! # Operator precedence (lowest to highest)
//!
//! | Level | Operators | Associativity |
//! |-------|-----------|---------------|
//! | 1 | `=` | Right |
//! | 2 | `or` | Left |
//! | 3 | `and` | Left |
//! | 4 | `==`, `!=` | Left |
//! | 5 | `<`, `<=`, `>`, `>=` | Left |
//! | 6 | `+`, `-` | Left |
//! | 7 | `*`, `/` | Left |
//! | 8 | `!`, `-` (unary) | Prefix |
//! | 9 | `()` call, `.` property | Postfix |
//!
//! Each infix operator has a left and a right binding power; parsing with a
//! minimum binding power consumes only operators that bind at least that
//! tightly. Left-associative operators use `right = left + 1`, assignment
//! uses `right = left - 1` so it nests to the right.

use crate::ast::{Expr, ExprId, LitValue};
use crate::{ParseResult, Parser};
use lox_lex::{Literal, TokenKind};

/// Binding power levels. Higher binds tighter.
pub(crate) mod bp {
    /// Minimum binding power (start of expression)
    pub const MIN: u8 = 0;

    /// Assignment: `=`
    pub const ASSIGNMENT: u8 = 2;

    /// Logical OR: `or`
    pub const LOGICAL_OR: u8 = 4;

    /// Logical AND: `and`
    pub const LOGICAL_AND: u8 = 6;

    /// Equality: `==`, `!=`
    pub const EQUALITY: u8 = 8;

    /// Comparison: `<`, `<=`, `>`, `>=`
    pub const COMPARISON: u8 = 10;

    /// Additive: `+`, `-`
    pub const TERM: u8 = 12;

    /// Multiplicative: `*`, `/`
    pub const FACTOR: u8 = 14;

    /// Prefix operators: `!`, unary `-`
    pub const UNARY: u8 = 16;

    /// Postfix call and property access: `(`, `.`
    pub const CALL: u8 = 18;
}

/// Left and right binding powers for an infix or postfix token.
///
/// Returns `None` for tokens that cannot continue an expression.
fn infix_binding_power(kind: TokenKind) -> Option<(u8, u8)> {
    let powers = match kind {
        TokenKind::Equal => (bp::ASSIGNMENT, bp::ASSIGNMENT - 1),
        TokenKind::Or => (bp::LOGICAL_OR, bp::LOGICAL_OR + 1),
        TokenKind::And => (bp::LOGICAL_AND, bp::LOGICAL_AND + 1),
        TokenKind::BangEqual | TokenKind::EqualEqual => (bp::EQUALITY, bp::EQUALITY + 1),
        TokenKind::Greater
        | TokenKind::GreaterEqual
        | TokenKind::Less
        | TokenKind::LessEqual => (bp::COMPARISON, bp::COMPARISON + 1),
        TokenKind::Minus | TokenKind::Plus => (bp::TERM, bp::TERM + 1),
        TokenKind::Slash | TokenKind::Star => (bp::FACTOR, bp::FACTOR + 1),
        TokenKind::LeftParen | TokenKind::Dot => (bp::CALL, bp::CALL + 1),
        _ => return None,
    };
    Some(powers)
}

impl Parser<'_> {
    /// Parse a full expression.
    pub(crate) fn expression(&mut self) -> ParseResult<Expr> {
        self.parse_expr(bp::MIN)
    }

    /// Pratt core: parse an expression whose operators all bind at least
    /// as tightly as `min_bp`.
    fn parse_expr(&mut self, min_bp: u8) -> ParseResult<Expr> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let kind = self.peek().kind;
            let Some((left_bp, right_bp)) = infix_binding_power(kind) else {
                break;
            };
            if left_bp < min_bp {
                break;
            }

            let op = self.advance();
            lhs = match kind {
                TokenKind::LeftParen => self.finish_call(lhs)?,

                TokenKind::Dot => {
                    let name = self.consume(
                        TokenKind::Identifier,
                        "Expect property name after '.'.",
                    )?;
                    Expr::Get {
                        object: Box::new(lhs),
                        name,
                    }
                }

                TokenKind::Equal => {
                    // Parse the value first, then decide whether the target
                    // was assignable. An invalid target reports without
                    // unwinding; the expression parsed so far stands in.
                    let value = self.parse_expr(right_bp)?;
                    match lhs {
                        Expr::Variable { name, .. } => Expr::Assign {
                            id: ExprId::next(),
                            name,
                            value: Box::new(value),
                        },
                        Expr::Get { object, name } => Expr::Set {
                            object,
                            name,
                            value: Box::new(value),
                        },
                        other => {
                            self.error(&op, "Invalid assignment target.");
                            other
                        }
                    }
                }

                TokenKind::Or | TokenKind::And => {
                    let right = self.parse_expr(right_bp)?;
                    Expr::Logical {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(right),
                    }
                }

                _ => {
                    let right = self.parse_expr(right_bp)?;
                    Expr::Binary {
                        left: Box::new(lhs),
                        op,
                        right: Box::new(right),
                    }
                }
            };
        }

        Ok(lhs)
    }

    /// Parse a prefix expression: a unary operator chain or a primary.
    fn parse_prefix(&mut self) -> ParseResult<Expr> {
        match self.peek().kind {
            TokenKind::Bang | TokenKind::Minus => {
                let op = self.advance();
                let right = self.parse_expr(bp::UNARY)?;
                Ok(Expr::Unary {
                    op,
                    right: Box::new(right),
                })
            }
            _ => self.primary(),
        }
    }

    /// Parse a primary expression: literal, variable, `this`, `super`
    /// access, or a parenthesized group.
    fn primary(&mut self) -> ParseResult<Expr> {
        let token = self.peek();
        let expr = match token.kind {
            TokenKind::False => {
                self.advance();
                Expr::Literal {
                    value: LitValue::Bool(false),
                }
            }
            TokenKind::True => {
                self.advance();
                Expr::Literal {
                    value: LitValue::Bool(true),
                }
            }
            TokenKind::Nil => {
                self.advance();
                Expr::Literal {
                    value: LitValue::Nil,
                }
            }

            TokenKind::Number | TokenKind::Str => {
                let token = self.advance();
                let value = match token.literal {
                    Some(Literal::Number(n)) => LitValue::Number(n),
                    Some(Literal::Str(s)) => LitValue::Str(s),
                    None => LitValue::Nil,
                };
                Expr::Literal { value }
            }

            TokenKind::Super => {
                let keyword = self.advance();
                self.consume(TokenKind::Dot, "Expect '.' after 'super'.")?;
                let method =
                    self.consume(TokenKind::Identifier, "Expect superclass method name.")?;
                Expr::Super {
                    id: ExprId::next(),
                    keyword,
                    method,
                }
            }

            TokenKind::This => Expr::This {
                id: ExprId::next(),
                keyword: self.advance(),
            },

            TokenKind::Identifier => Expr::Variable {
                id: ExprId::next(),
                name: self.advance(),
            },

            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.consume(TokenKind::RightParen, "Expect ')' after expression.")?;
                Expr::Grouping {
                    inner: Box::new(inner),
                }
            }

            _ => return Err(self.error(&token, "Expect expression.")),
        };
        Ok(expr)
    }

    /// Parse the argument list and closing parenthesis of a call.
    ///
    /// The opening parenthesis has already been consumed by the postfix
    /// loop. The `Call` node keeps the closing parenthesis so runtime call
    /// errors have a location.
    fn finish_call(&mut self, callee: Expr) -> ParseResult<Expr> {
        let mut args = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                if args.len() >= 255 {
                    self.error(&self.peek(), "Can't have more than 255 arguments.");
                }
                args.push(self.expression()?);
                if !self.matches(TokenKind::Comma) {
                    break;
                }
            }
        }

        let paren = self.consume(TokenKind::RightParen, "Expect ')' after arguments.")?;
        Ok(Expr::Call {
            callee: Box::new(callee),
            paren,
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use lox_lex::{scan_tokens, TokenKind};
    use lox_util::Handler;

    use crate::{Expr, Parser, Stmt};

    fn parse_expression(source: &str) -> Expr {
        let handler = Handler::new();
        let tokens = scan_tokens(&format!("{source};"), &handler);
        let mut statements = Parser::new(tokens, &handler).parse();
        assert!(!handler.had_error(), "unexpected parse error in {source:?}");
        match statements.pop() {
            Some(Stmt::Expression(expr)) => expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    fn parse_with_errors(source: &str) -> (Vec<Stmt>, Handler) {
        let handler = Handler::new();
        let tokens = scan_tokens(source, &handler);
        let statements = Parser::new(tokens, &handler).parse();
        (statements, handler)
    }

    #[test]
    fn test_factor_binds_tighter_than_term() {
        // 1 + 2 * 3 parses as 1 + (2 * 3)
        let expr = parse_expression("1 + 2 * 3");
        let Expr::Binary { op, right, .. } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op.kind, TokenKind::Plus);
        assert!(matches!(
            *right,
            Expr::Binary { op, .. } if op.kind == TokenKind::Star
        ));
    }

    #[test]
    fn test_term_is_left_associative() {
        // 1 - 2 - 3 parses as (1 - 2) - 3
        let expr = parse_expression("1 - 2 - 3");
        let Expr::Binary { left, op, .. } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op.kind, TokenKind::Minus);
        assert!(matches!(
            *left,
            Expr::Binary { op, .. } if op.kind == TokenKind::Minus
        ));
    }

    #[test]
    fn test_assignment_is_right_associative() {
        // a = b = 1 parses as a = (b = 1)
        let expr = parse_expression("a = b = 1");
        let Expr::Assign { value, .. } = expr else {
            panic!("expected assignment");
        };
        assert!(matches!(*value, Expr::Assign { .. }));
    }

    #[test]
    fn test_or_binds_looser_than_and() {
        // a or b and c parses as a or (b and c)
        let expr = parse_expression("a or b and c");
        let Expr::Logical { op, right, .. } = expr else {
            panic!("expected logical node");
        };
        assert_eq!(op.kind, TokenKind::Or);
        assert!(matches!(
            *right,
            Expr::Logical { op, .. } if op.kind == TokenKind::And
        ));
    }

    #[test]
    fn test_comparison_below_equality() {
        // 1 < 2 == true parses as (1 < 2) == true
        let expr = parse_expression("1 < 2 == true");
        let Expr::Binary { left, op, .. } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op.kind, TokenKind::EqualEqual);
        assert!(matches!(
            *left,
            Expr::Binary { op, .. } if op.kind == TokenKind::Less
        ));
    }

    #[test]
    fn test_unary_chains() {
        let expr = parse_expression("!!false");
        let Expr::Unary { right, .. } = expr else {
            panic!("expected unary node");
        };
        assert!(matches!(*right, Expr::Unary { .. }));
    }

    #[test]
    fn test_grouping_overrides_precedence() {
        // (1 + 2) * 3 keeps the grouping on the left
        let expr = parse_expression("(1 + 2) * 3");
        let Expr::Binary { left, op, .. } = expr else {
            panic!("expected binary node");
        };
        assert_eq!(op.kind, TokenKind::Star);
        assert!(matches!(*left, Expr::Grouping { .. }));
    }

    #[test]
    fn test_call_chain_with_properties() {
        // a.b(1).c parses postfix left to right
        let expr = parse_expression("a.b(1).c");
        let Expr::Get { object, .. } = expr else {
            panic!("expected property access");
        };
        assert!(matches!(*object, Expr::Call { .. }));
    }

    #[test]
    fn test_property_assignment_becomes_set() {
        let expr = parse_expression("a.b = 1");
        assert!(matches!(expr, Expr::Set { .. }));
    }

    #[test]
    fn test_super_access() {
        let handler = Handler::new();
        let tokens = scan_tokens("super.method();", &handler);
        Parser::new(tokens, &handler).parse();
        assert!(!handler.had_error());
    }

    #[test]
    fn test_invalid_assignment_target_reports_without_unwinding() {
        let (statements, handler) = parse_with_errors("1 + 2 = 3;\nprint 4;");
        assert!(handler.had_error());
        let messages: Vec<_> = handler
            .diagnostics()
            .into_iter()
            .map(|d| d.message)
            .collect();
        assert!(messages.contains(&"Invalid assignment target.".to_owned()));
        // No unwind: both statements still parse.
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_too_many_arguments_reports_without_unwinding() {
        let args: Vec<String> = (0..=255).map(|i| i.to_string()).collect();
        let source = format!("f({});", args.join(", "));
        let (statements, handler) = parse_with_errors(&source);
        assert!(handler.had_error());
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message == "Can't have more than 255 arguments."));
        // The call still parses with all its arguments.
        assert_eq!(statements.len(), 1);
    }

    #[test]
    fn test_missing_expression() {
        let (_, handler) = parse_with_errors("print ;");
        assert!(handler
            .diagnostics()
            .iter()
            .any(|d| d.message == "Expect expression."));
    }
}
