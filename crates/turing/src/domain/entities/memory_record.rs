//! MemoryRecord - One persisted utterance of a session
//!
//! Pure domain entity without infrastructure dependencies.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Role;

/// MemoryRecord - A single user or assistant message kept for retrieval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier, derived from the session id and creation time
    pub id: String,
    /// Conversational scope this record belongs to
    pub session_id: String,
    pub role: Role,
    pub text: String,
    /// Creation time, never modified
    pub timestamp: DateTime<Utc>,
    /// Embedding computed by the store at insert time
    #[serde(default, skip_serializing)]
    pub embedding: Vec<f32>,
}

impl MemoryRecord {
    /// Create a new record stamped with the current time
    pub fn new(session_id: String, role: Role, text: String, embedding: Vec<f32>) -> Self {
        let timestamp = Utc::now();
        Self {
            id: Self::derive_id(&session_id, &timestamp),
            session_id,
            role,
            text,
            timestamp,
            embedding,
        }
    }

    /// `<session>_<rfc3339 nanos>_<suffix>`; the random suffix keeps ids unique
    /// when two writes land on the same clock tick.
    pub fn derive_id(session_id: &str, timestamp: &DateTime<Utc>) -> String {
        let suffix = uuid::Uuid::new_v4().simple().to_string();
        format!(
            "{}_{}_{}",
            session_id,
            timestamp.to_rfc3339_opts(chrono::SecondsFormat::Nanos, true),
            &suffix[..8]
        )
    }
}

/// A record paired with its cosine distance to a query (smaller = closer)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredRecord {
    pub record: MemoryRecord,
    pub distance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique_under_rapid_writes() {
        let ids: HashSet<String> = (0..500)
            .map(|_| {
                MemoryRecord::new("s1".into(), Role::User, "hello".into(), vec![]).id
            })
            .collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_id_carries_session_prefix() {
        let record = MemoryRecord::new("sidebar".into(), Role::Assistant, "hi".into(), vec![1.0]);
        assert!(record.id.starts_with("sidebar_"));
    }

    #[test]
    fn test_embedding_not_serialized() {
        let record = MemoryRecord::new("s".into(), Role::User, "x".into(), vec![0.5; 8]);
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("embedding").is_none());
        assert_eq!(json["role"], "user");
    }
}
