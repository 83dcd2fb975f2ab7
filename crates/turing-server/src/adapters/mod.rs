//! Adapters
//!
//! Implementations of the ports defined in the `turing` domain crate.

pub mod channel_sink;
pub mod filesystem;
pub mod hashing;
pub mod ollama;
pub mod routing;
pub mod sqlite;

pub use channel_sink::ChannelSink;
pub use filesystem::LocalFileSkill;
pub use hashing::HashingEmbedding;
pub use ollama::{OllamaClient, OllamaEmbedding};
pub use routing::KeywordFileRouting;
pub use sqlite::SqliteMemoryStore;
