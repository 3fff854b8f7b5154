//! Authoritative engine for plan-driven territory games.
//!
//! Players submit plans in the terraplan DSL; this crate parses and runs them
//! against a persisted grid world, emits the per-plan event log, and advances
//! turn order. Persistence goes through the [`store::GameStore`] trait so the
//! key-value technology stays swappable; [`store::MemoryStore`] backs tests
//! and local play.

pub mod config;
mod engine;
mod environment;
mod error;
pub mod notify;
mod service;
pub mod store;
mod turn;

pub use crate::engine::{ActionOutcome, GameEngine};
pub use crate::environment::PlanEnvironment;
pub use crate::error::GameError;
pub use crate::service::GameService;
pub use crate::turn::{accrue_interest, advance_turn, TurnAdvance};
