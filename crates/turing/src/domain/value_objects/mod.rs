//! Value Objects
//!
//! Immutable value types.

mod role;
mod turn_phase;

pub use role::*;
pub use turn_phase::*;
