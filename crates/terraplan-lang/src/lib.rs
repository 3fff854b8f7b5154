//! The plan DSL: a small imperative language; players submit one program
//! (a "plan") per turn.
//!
//! Front end: [`Tokenizer`] → [`Parser`] → [`Plan`]. Evaluation binds the AST
//! to a world through the composable [`Variables`] + [`GameWorld`] capability
//! traits, so the interpreter itself knows nothing about game rules.

mod ast;
mod error;
mod eval;
mod parser;
mod token;
mod tokenizer;

pub use crate::ast::*;
pub use crate::error::LangError;
pub use crate::eval::{Environment, GameWorld, Variables, MAX_LOOP_ITERATIONS};
pub use crate::parser::{parse_plan, Parser};
pub use crate::token::{Token, TokenKind};
pub use crate::tokenizer::Tokenizer;
