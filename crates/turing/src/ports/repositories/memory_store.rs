//! Memory Store Port
//!
//! Abstract interface for the persistent, session-scoped semantic store.
//! Implementations own the embedding index and compute embeddings themselves.

use async_trait::async_trait;

use crate::domain::services::format_context;
use crate::domain::{errors::DomainError, MemoryRecord, Role, ScoredRecord};

/// Number of records injected into a prompt when the caller does not say otherwise
pub const DEFAULT_RETRIEVAL_LIMIT: usize = 5;

/// Repository interface for memory records
#[async_trait]
pub trait MemoryStore: Send + Sync {
    /// Insert one record.
    ///
    /// Blank text is skipped without error and returns `Ok(None)`.
    async fn save(
        &self,
        session_id: &str,
        role: Role,
        text: &str,
    ) -> Result<Option<MemoryRecord>, DomainError>;

    /// Closest records of `session_id` to `query`, best match first
    async fn search(
        &self,
        session_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<Vec<ScoredRecord>, DomainError>;

    /// Formatted context block for prompt injection, or `""` when nothing matches
    async fn retrieve(
        &self,
        session_id: &str,
        query: &str,
        limit: usize,
    ) -> Result<String, DomainError> {
        let matches = self.search(session_id, query, limit).await?;
        Ok(format_context(matches.iter().map(|m| &m.record)))
    }

    /// Most recent records of a session, oldest first
    async fn history(&self, session_id: &str, limit: usize)
        -> Result<Vec<MemoryRecord>, DomainError>;

    /// Total number of records across all sessions
    async fn count(&self) -> Result<u64, DomainError>;

    /// Destroy every record of every session. Irreversible.
    async fn wipe(&self) -> Result<(), DomainError>;
}
