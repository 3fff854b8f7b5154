//! AST evaluation against composable capability traits.
//!
//! [`Variables`] covers plan-local variable storage; [`GameWorld`] covers the
//! action/query surface. A test double can implement just the variable side
//! and stub the world, which is how the tests below run plans without a game.

use terraplan_protocol::Direction;

use crate::ast::{Action, BinaryOp, Expr, Plan, SpecialValue, Stmt};
use crate::error::LangError;

/// Loop iteration cap: a `while` whose condition is still truthy after this
/// many body evaluations fails the whole plan with `InfiniteLoop`.
pub const MAX_LOOP_ITERATIONS: usize = 1000;

/// Plan-local variable storage.
pub trait Variables {
    fn get_var(&self, name: &str) -> Option<i64>;
    fn set_var(&mut self, name: &str, value: i64);
}

/// The world surface a plan can touch. Every method may fail below the
/// capability boundary (store errors), hence the `Result`s. Queries take
/// `&mut self` because implementations record an event per call.
pub trait GameWorld {
    fn move_cursor(&mut self, dir: Direction) -> Result<bool, LangError>;
    fn relocate(&mut self) -> Result<i64, LangError>;
    fn invest(&mut self, amount: i64) -> Result<i64, LangError>;
    fn collect(&mut self, amount: i64) -> Result<i64, LangError>;
    fn shoot(&mut self, dir: Direction, money: i64) -> Result<i64, LangError>;
    fn opponent(&mut self) -> Result<i64, LangError>;
    fn nearby(&mut self, dir: Direction) -> Result<i64, LangError>;

    /// Mark the plan finished; evaluation stops after the current statement.
    fn done(&mut self) -> Result<(), LangError>;
    fn is_done(&self) -> bool;

    fn rows(&mut self) -> Result<i64, LangError>;
    fn cols(&mut self) -> Result<i64, LangError>;
    fn current_row(&mut self) -> Result<i64, LangError>;
    fn current_col(&mut self) -> Result<i64, LangError>;
    fn budget(&mut self) -> Result<i64, LangError>;
    fn deposit(&mut self) -> Result<i64, LangError>;
    fn interest(&mut self) -> Result<i64, LangError>;
    fn max_deposit(&mut self) -> Result<i64, LangError>;
    fn random(&mut self) -> Result<i64, LangError>;
}

/// Everything a statement needs. Blanket-implemented for any type carrying
/// both capabilities.
pub trait Environment: Variables + GameWorld {}

impl<T: Variables + GameWorld + ?Sized> Environment for T {}

impl Expr {
    pub fn eval<E: Environment + ?Sized>(&self, env: &mut E) -> Result<i64, LangError> {
        match self {
            Expr::Number(n) => Ok(*n),
            Expr::Identifier(name) => env
                .get_var(name)
                .ok_or_else(|| LangError::UndefinedVariable(name.clone())),
            Expr::Special(special) => match special {
                SpecialValue::Rows => env.rows(),
                SpecialValue::Cols => env.cols(),
                SpecialValue::CurRow => env.current_row(),
                SpecialValue::CurCol => env.current_col(),
                SpecialValue::Budget => env.budget(),
                SpecialValue::Deposit => env.deposit(),
                SpecialValue::Interest => env.interest(),
                SpecialValue::MaxDeposit => env.max_deposit(),
                SpecialValue::Random => env.random(),
            },
            Expr::Binary { op, lhs, rhs } => {
                let left = lhs.eval(env)?;
                let right = rhs.eval(env)?;
                apply(*op, left, right)
            }
            Expr::Opponent => env.opponent(),
            Expr::Nearby(dir) => env.nearby(*dir),
        }
    }
}

fn apply(op: BinaryOp, left: i64, right: i64) -> Result<i64, LangError> {
    match op {
        BinaryOp::Add => Ok(left.wrapping_add(right)),
        BinaryOp::Sub => Ok(left.wrapping_sub(right)),
        BinaryOp::Mul => Ok(left.wrapping_mul(right)),
        BinaryOp::Div => {
            if right == 0 {
                Err(LangError::DivisionByZero)
            } else {
                Ok(left.wrapping_div(right))
            }
        }
        BinaryOp::Rem => {
            if right == 0 {
                Err(LangError::DivisionByZero)
            } else {
                Ok(left.wrapping_rem(right))
            }
        }
        // Double-precision power truncated to integer, so large exponents
        // round the same way across reimplementations.
        BinaryOp::Pow => Ok((left as f64).powf(right as f64) as i64),
    }
}

impl Stmt {
    /// Evaluate one statement. The last statement's value propagates out of
    /// blocks and plans; the engine ignores it, tests don't.
    pub fn eval<E: Environment + ?Sized>(&self, env: &mut E) -> Result<i64, LangError> {
        match self {
            Stmt::Block(statements) => {
                let mut last = 0;
                for stmt in statements {
                    if env.is_done() {
                        break;
                    }
                    last = stmt.eval(env)?;
                }
                Ok(last)
            }
            Stmt::If {
                cond,
                then_branch,
                else_branch,
            } => {
                if cond.eval(env)? > 0 {
                    then_branch.eval(env)
                } else {
                    else_branch.eval(env)
                }
            }
            Stmt::While { cond, body } => {
                let mut last = 0;
                let mut iterations = 0;
                while !env.is_done() && cond.eval(env)? > 0 {
                    if iterations >= MAX_LOOP_ITERATIONS {
                        return Err(LangError::InfiniteLoop);
                    }
                    last = body.eval(env)?;
                    iterations += 1;
                }
                Ok(last)
            }
            Stmt::Assign { name, expr } => {
                let value = expr.eval(env)?;
                env.set_var(name, value);
                Ok(value)
            }
            Stmt::Action(action) => action.eval(env),
        }
    }
}

impl Action {
    fn eval<E: Environment + ?Sized>(&self, env: &mut E) -> Result<i64, LangError> {
        match self {
            Action::Done => {
                env.done()?;
                Ok(0)
            }
            Action::Relocate => env.relocate(),
            Action::Move(dir) => Ok(env.move_cursor(*dir)? as i64),
            Action::Invest(expr) => {
                let amount = expr.eval(env)?;
                env.invest(amount)
            }
            Action::Collect(expr) => {
                let amount = expr.eval(env)?;
                env.collect(amount)
            }
            Action::Shoot(dir, expr) => {
                let money = expr.eval(env)?;
                env.shoot(*dir, money)
            }
        }
    }
}

impl Plan {
    /// Run the plan to completion (or until `done`), returning the last
    /// statement's value.
    pub fn execute<E: Environment + ?Sized>(&self, env: &mut E) -> Result<i64, LangError> {
        let mut last = 0;
        for stmt in &self.statements {
            if env.is_done() {
                break;
            }
            last = stmt.eval(env)?;
        }
        Ok(last)
    }
}
