use terraplan_protocol::Direction;

use crate::ast::{Action, BinaryOp, Expr, Plan, SpecialValue, Stmt};
use crate::error::LangError;
use crate::token::TokenKind;
use crate::tokenizer::Tokenizer;

/// Parse a complete plan from source. An empty plan (nothing but whitespace
/// and comments) is a parse error, not an empty program.
pub fn parse_plan(source: &str) -> Result<Plan, LangError> {
    Parser::new(source)?.plan()
}

/// Recursive-descent parser over a single shared token cursor.
pub struct Parser {
    tokens: Tokenizer,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, LangError> {
        Ok(Self {
            tokens: Tokenizer::new(source)?,
        })
    }

    pub fn plan(&mut self) -> Result<Plan, LangError> {
        let mut statements = Vec::new();
        while self.tokens.has_next() {
            statements.push(self.statement()?);
        }
        if statements.is_empty() {
            return Err(LangError::EmptyPlan);
        }
        Ok(Plan { statements })
    }

    fn statement(&mut self) -> Result<Stmt, LangError> {
        if !self.tokens.has_next() {
            return Err(LangError::MissingToken {
                expected: "statement".into(),
            });
        }
        let pos = self.tokens.position();
        match self.tokens.peek_kind() {
            TokenKind::Keyword => {
                let word = self.tokens.consume()?;
                match word.as_str() {
                    "if" => self.if_statement(),
                    "while" => self.while_statement(),
                    "done" => Ok(Stmt::Action(Action::Done)),
                    "relocate" => Ok(Stmt::Action(Action::Relocate)),
                    "move" => Ok(Stmt::Action(Action::Move(self.direction()?))),
                    "invest" => Ok(Stmt::Action(Action::Invest(self.expr()?))),
                    "collect" => Ok(Stmt::Action(Action::Collect(self.expr()?))),
                    "shoot" => {
                        let dir = self.direction()?;
                        let money = self.expr()?;
                        Ok(Stmt::Action(Action::Shoot(dir, money)))
                    }
                    _ => Err(LangError::UnknownCommand { word, pos }),
                }
            }
            TokenKind::Operator if self.tokens.peek_value() == "{" => self.block(),
            TokenKind::Identifier => {
                // Special value names are reserved: readable anywhere in an
                // expression, never assignable.
                if SpecialValue::from_name(self.tokens.peek_value()).is_some() {
                    return Err(LangError::InvalidStatement { pos });
                }
                let name = self.tokens.consume()?;
                self.expect("=")?;
                let expr = self.expr()?;
                Ok(Stmt::Assign { name, expr })
            }
            _ => Err(LangError::InvalidStatement { pos }),
        }
    }

    fn if_statement(&mut self) -> Result<Stmt, LangError> {
        self.expect("(")?;
        let cond = self.expr()?;
        self.expect(")")?;
        self.expect("then")?;
        let then_branch = Box::new(self.statement()?);
        self.expect("else")?;
        let else_branch = Box::new(self.statement()?);
        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
        })
    }

    fn while_statement(&mut self) -> Result<Stmt, LangError> {
        self.expect("(")?;
        let cond = self.expr()?;
        self.expect(")")?;
        let body = Box::new(self.statement()?);
        Ok(Stmt::While { cond, body })
    }

    fn block(&mut self) -> Result<Stmt, LangError> {
        self.expect("{")?;
        let mut statements = Vec::new();
        loop {
            if !self.tokens.has_next() {
                return Err(LangError::MissingToken {
                    expected: "}".into(),
                });
            }
            if self.tokens.peek_value() == "}" {
                self.tokens.consume()?;
                break;
            }
            statements.push(self.statement()?);
        }
        Ok(Stmt::Block(statements))
    }

    fn direction(&mut self) -> Result<Direction, LangError> {
        if !self.tokens.has_next() {
            return Err(LangError::MissingToken {
                expected: "direction".into(),
            });
        }
        let pos = self.tokens.position();
        if self.tokens.peek_kind() != TokenKind::Keyword {
            return Err(LangError::InvalidDirection { pos });
        }
        let word = self.tokens.consume()?;
        word.parse()
            .map_err(|_| LangError::InvalidDirection { pos })
    }

    // expr := term (("+"|"-") term)*
    fn expr(&mut self) -> Result<Expr, LangError> {
        let mut lhs = self.term()?;
        while self.tokens.has_next()
            && self.tokens.peek_kind() == TokenKind::Operator
            && matches!(self.tokens.peek_value(), "+" | "-")
        {
            let op: BinaryOp = self.tokens.consume()?.parse()?;
            let rhs = self.term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // term := factor (("*"|"/"|"%") factor)*
    fn term(&mut self) -> Result<Expr, LangError> {
        let mut lhs = self.factor()?;
        while self.tokens.has_next()
            && self.tokens.peek_kind() == TokenKind::Operator
            && matches!(self.tokens.peek_value(), "*" | "/" | "%")
        {
            let op: BinaryOp = self.tokens.consume()?.parse()?;
            let rhs = self.factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    // factor := power ("^" factor)?   — right-associative by recursion
    fn factor(&mut self) -> Result<Expr, LangError> {
        let lhs = self.power()?;
        if self.tokens.has_next() && self.tokens.peek_value() == "^" {
            self.tokens.consume()?;
            let rhs = self.factor()?;
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            });
        }
        Ok(lhs)
    }

    // power := NUMBER | SPECIAL | IDENT | "(" expr ")" | info
    fn power(&mut self) -> Result<Expr, LangError> {
        if !self.tokens.has_next() {
            return Err(LangError::MissingToken {
                expected: "expression".into(),
            });
        }
        let pos = self.tokens.position();
        match self.tokens.peek_kind() {
            TokenKind::Number => {
                let literal = self.tokens.consume()?;
                literal
                    .parse()
                    .map(Expr::Number)
                    .map_err(|_| LangError::InvalidExpression { pos })
            }
            TokenKind::Identifier => {
                let name = self.tokens.consume()?;
                match SpecialValue::from_name(&name) {
                    Some(special) => Ok(Expr::Special(special)),
                    None => Ok(Expr::Identifier(name)),
                }
            }
            TokenKind::Keyword => match self.tokens.peek_value() {
                "opponent" => {
                    self.tokens.consume()?;
                    Ok(Expr::Opponent)
                }
                "nearby" => {
                    self.tokens.consume()?;
                    Ok(Expr::Nearby(self.direction()?))
                }
                _ => Err(LangError::InvalidExpression { pos }),
            },
            TokenKind::Operator if self.tokens.peek_value() == "(" => {
                self.tokens.consume()?;
                let inner = self.expr()?;
                self.expect(")")?;
                Ok(inner)
            }
            _ => Err(LangError::InvalidExpression { pos }),
        }
    }

    fn expect(&mut self, expected: &str) -> Result<(), LangError> {
        if !self.tokens.has_next() {
            return Err(LangError::MissingToken {
                expected: expected.to_string(),
            });
        }
        if self.tokens.peek_value() != expected {
            return Err(LangError::UnexpectedToken {
                expected: expected.to_string(),
                found: self.tokens.peek_value().to_string(),
                pos: self.tokens.position(),
            });
        }
        self.tokens.consume()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_plan_is_an_error() {
        assert_eq!(parse_plan("").unwrap_err(), LangError::EmptyPlan);
        assert_eq!(
            parse_plan("  # only a comment\n").unwrap_err(),
            LangError::EmptyPlan
        );
    }

    #[test]
    fn parses_simple_actions() {
        let plan = parse_plan("done relocate move up").unwrap();
        assert_eq!(
            plan.statements,
            vec![
                Stmt::Action(Action::Done),
                Stmt::Action(Action::Relocate),
                Stmt::Action(Action::Move(Direction::Up)),
            ]
        );
    }

    #[test]
    fn parses_actions_with_expressions() {
        let plan = parse_plan("invest 10 + 5 shoot downright budget / 2").unwrap();
        assert_eq!(plan.statements.len(), 2);
        match &plan.statements[1] {
            Stmt::Action(Action::Shoot(dir, expr)) => {
                assert_eq!(*dir, Direction::DownRight);
                assert_eq!(
                    *expr,
                    Expr::Binary {
                        op: BinaryOp::Div,
                        lhs: Box::new(Expr::Special(SpecialValue::Budget)),
                        rhs: Box::new(Expr::Number(2)),
                    }
                );
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        let plan = parse_plan("x = 1 + 2 * 3").unwrap();
        match &plan.statements[0] {
            Stmt::Assign { expr, .. } => match expr {
                Expr::Binary { op, rhs, .. } => {
                    assert_eq!(*op, BinaryOp::Add);
                    assert!(matches!(
                        **rhs,
                        Expr::Binary {
                            op: BinaryOp::Mul,
                            ..
                        }
                    ));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn power_nests_to_the_right() {
        let plan = parse_plan("x = 2 ^ 3 ^ 2").unwrap();
        match &plan.statements[0] {
            Stmt::Assign { expr, .. } => match expr {
                Expr::Binary { op, lhs, rhs } => {
                    assert_eq!(*op, BinaryOp::Pow);
                    assert_eq!(**lhs, Expr::Number(2));
                    assert!(matches!(
                        **rhs,
                        Expr::Binary {
                            op: BinaryOp::Pow,
                            ..
                        }
                    ));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parens_override_precedence() {
        let plan = parse_plan("x = (1 + 2) * 3").unwrap();
        match &plan.statements[0] {
            Stmt::Assign { expr, .. } => {
                assert!(matches!(
                    expr,
                    Expr::Binary {
                        op: BinaryOp::Mul,
                        ..
                    }
                ));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parses_if_then_else_and_nested_blocks() {
        let plan = parse_plan("if (nearby up) then { shoot up 5 done } else move up").unwrap();
        match &plan.statements[0] {
            Stmt::If {
                cond, then_branch, ..
            } => {
                assert_eq!(*cond, Expr::Nearby(Direction::Up));
                assert!(matches!(**then_branch, Stmt::Block(ref inner) if inner.len() == 2));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn parses_while_with_block_body() {
        let plan = parse_plan("while (x) { x = x - 1 }").unwrap();
        assert!(matches!(plan.statements[0], Stmt::While { .. }));
    }

    #[test]
    fn bare_condition_is_rejected() {
        assert_eq!(
            parse_plan("if budget then invest 5 else done").unwrap_err(),
            LangError::UnexpectedToken {
                expected: "(".into(),
                found: "budget".into(),
                pos: 3,
            }
        );
    }

    #[test]
    fn missing_then_is_unexpected_token() {
        assert_eq!(
            parse_plan("if (1) move up else done").unwrap_err(),
            LangError::UnexpectedToken {
                expected: "then".into(),
                found: "move".into(),
                pos: 7,
            }
        );
    }

    #[test]
    fn unclosed_block_is_missing_token() {
        assert_eq!(
            parse_plan("{ move up").unwrap_err(),
            LangError::MissingToken {
                expected: "}".into()
            }
        );
    }

    #[test]
    fn bad_direction_is_invalid_direction() {
        assert_eq!(
            parse_plan("move then").unwrap_err(),
            LangError::InvalidDirection { pos: 5 }
        );
        assert!(matches!(
            parse_plan("move 5").unwrap_err(),
            LangError::InvalidDirection { .. }
        ));
    }

    #[test]
    fn stray_keyword_is_unknown_command() {
        assert_eq!(
            parse_plan("up").unwrap_err(),
            LangError::UnknownCommand {
                word: "up".into(),
                pos: 0,
            }
        );
    }

    #[test]
    fn number_in_statement_position_is_invalid() {
        assert_eq!(
            parse_plan("42").unwrap_err(),
            LangError::InvalidStatement { pos: 0 }
        );
    }

    #[test]
    fn special_names_resolve_in_expressions() {
        let plan = parse_plan("x = deposit + maxdeposit").unwrap();
        match &plan.statements[0] {
            Stmt::Assign { expr, .. } => match expr {
                Expr::Binary { lhs, rhs, .. } => {
                    assert_eq!(**lhs, Expr::Special(SpecialValue::Deposit));
                    assert_eq!(**rhs, Expr::Special(SpecialValue::MaxDeposit));
                }
                other => panic!("unexpected: {other:?}"),
            },
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn special_names_are_not_assignable() {
        assert_eq!(
            parse_plan("budget = 5").unwrap_err(),
            LangError::InvalidStatement { pos: 0 }
        );
    }

    #[test]
    fn truncated_expression_is_missing_token() {
        assert_eq!(
            parse_plan("x = 1 +").unwrap_err(),
            LangError::MissingToken {
                expected: "expression".into()
            }
        );
    }
}
