//! Turing Data Models
//!
//! Request/response types exchanged between `turingd` and its surfaces.

mod memory;
mod ndjson;
mod turn;

pub use memory::*;
pub use ndjson::LineBuffer;
pub use turn::*;
