//! Service Ports
//!
//! Abstract interfaces for external services.

mod embedding;
mod file_skill;
mod generation;
mod injection;

pub use embedding::*;
pub use file_skill::*;
pub use generation::*;
pub use injection::*;
