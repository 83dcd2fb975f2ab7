//! TurnPhase - Lifecycle of one generation turn

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// `Idle -> Retrieving -> Streaming -> Persisting -> Idle`, or `-> Failed -> Idle`
/// when the generation service could not produce a response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Idle,
    Retrieving,
    Streaming,
    Persisting,
    Failed,
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TurnPhase::Idle => write!(f, "idle"),
            TurnPhase::Retrieving => write!(f, "retrieving"),
            TurnPhase::Streaming => write!(f, "streaming"),
            TurnPhase::Persisting => write!(f, "persisting"),
            TurnPhase::Failed => write!(f, "failed"),
        }
    }
}
