//! Memory DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{MemoryRecord, Role, ScoredRecord};

/// Search memories request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchMemoriesRequest {
    pub query: String,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HistoryQuery {
    /// Maximum number of records, newest kept (default 50)
    pub limit: Option<usize>,
}

/// Memory response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MemoryResponse {
    pub id: String,
    pub session_id: String,
    pub role: Role,
    pub text: String,
    /// Cosine distance to the query (search results only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
    pub timestamp: DateTime<Utc>,
}

impl From<MemoryRecord> for MemoryResponse {
    fn from(record: MemoryRecord) -> Self {
        Self {
            id: record.id,
            session_id: record.session_id,
            role: record.role,
            text: record.text,
            distance: None,
            timestamp: record.timestamp,
        }
    }
}

impl From<ScoredRecord> for MemoryResponse {
    fn from(scored: ScoredRecord) -> Self {
        Self {
            distance: Some(scored.distance),
            ..Self::from(scored.record)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WipeResponse {
    pub wiped: bool,
    /// Records that existed before the wipe
    pub removed: u64,
}
