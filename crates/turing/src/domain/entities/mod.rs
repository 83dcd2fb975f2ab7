//! Domain Entities
//!
//! Pure domain models without infrastructure dependencies.
//! - MemoryRecord: One persisted utterance, scoped by session
//! - Fragment: One piece of a streamed generation
//! - Turn: Transient request/response cycle

mod fragment;
mod memory_record;
mod turn;

pub use fragment::*;
pub use memory_record::*;
pub use turn::*;
