//! Repository Ports
//!
//! Abstract interfaces for data persistence.

mod memory_store;

pub use memory_store::*;
