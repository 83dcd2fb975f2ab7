//! SQLite Repository Implementations

mod memory_store;

pub use memory_store::SqliteMemoryStore;
