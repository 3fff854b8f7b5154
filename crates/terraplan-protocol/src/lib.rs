mod direction;
mod event;
mod ids;
mod types;
pub mod wire;

pub use crate::direction::*;
pub use crate::event::*;
pub use crate::ids::*;
pub use crate::types::*;
