use terraplan_protocol::Direction;

use crate::error::LangError;

/// World/player values readable as first-class expression terms.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpecialValue {
    Rows,
    Cols,
    CurRow,
    CurCol,
    Budget,
    Deposit,
    Interest,
    MaxDeposit,
    Random,
}

impl SpecialValue {
    /// Fixed name table. These lex as plain identifiers; the parser resolves
    /// them here. `int` is the historical short form of `interest`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rows" => Some(SpecialValue::Rows),
            "cols" => Some(SpecialValue::Cols),
            "curRow" => Some(SpecialValue::CurRow),
            "curCol" => Some(SpecialValue::CurCol),
            "budget" => Some(SpecialValue::Budget),
            "deposit" => Some(SpecialValue::Deposit),
            "int" | "interest" => Some(SpecialValue::Interest),
            "maxdeposit" => Some(SpecialValue::MaxDeposit),
            "random" => Some(SpecialValue::Random),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl std::str::FromStr for BinaryOp {
    type Err = LangError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "+" => Ok(BinaryOp::Add),
            "-" => Ok(BinaryOp::Sub),
            "*" => Ok(BinaryOp::Mul),
            "/" => Ok(BinaryOp::Div),
            "%" => Ok(BinaryOp::Rem),
            "^" => Ok(BinaryOp::Pow),
            other => Err(LangError::CannotUseOperator(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(i64),
    Identifier(String),
    Special(SpecialValue),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Distance-encoded scan for the closest opponent in any direction.
    Opponent,
    /// Same scan restricted to a single ray.
    Nearby(Direction),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Done,
    Relocate,
    Move(Direction),
    Invest(Expr),
    Collect(Expr),
    Shoot(Direction, Expr),
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Block(Vec<Stmt>),
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },
    While {
        cond: Expr,
        body: Box<Stmt>,
    },
    Assign {
        name: String,
        expr: Expr,
    },
    Action(Action),
}

/// A parsed plan: a non-empty, ordered statement list. The parser enforces
/// non-emptiness; there is no other way to construct one from source.
#[derive(Clone, Debug, PartialEq)]
pub struct Plan {
    pub statements: Vec<Stmt>,
}
