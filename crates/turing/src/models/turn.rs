//! Turn DTOs - Streaming wire format shared by the daemon and its clients

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::TurnOutcome;

/// Chat message sent to a session
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub message: String,
    /// Skip the filesystem injection strategy for this message
    #[serde(default)]
    pub no_injection: bool,
}

/// Memory-free prompt (spotlight, one-shot generation)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GenerateResponse {
    pub response: String,
    pub model: String,
}

/// Path to analyse (file or folder)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InspectRequest {
    pub path: String,
}

/// One line of an NDJSON response stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TurnEvent {
    /// Next piece of the reply, in generation order
    Fragment { text: String },
    /// Stream finished; turns report their outcome, ephemeral streams do not
    Done {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        outcome: Option<TurnOutcome>,
    },
    /// The turn could not run (validation, busy session)
    Error { message: String },
}

impl TurnEvent {
    pub fn fragment(text: impl Into<String>) -> Self {
        Self::Fragment { text: text.into() }
    }

    /// Serialize as a single newline-terminated JSON line
    pub fn to_ndjson(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|e| {
            format!(r#"{{"type":"error","message":"failed to encode event: {}"}}"#, e)
        });
        line.push('\n');
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fragment_line_format() {
        let line = TurnEvent::fragment("Hello\nworld").to_ndjson();
        assert_eq!(line, "{\"type\":\"fragment\",\"text\":\"Hello\\nworld\"}\n");
        assert_eq!(line.matches('\n').count(), 1);
    }

    #[test]
    fn test_done_without_outcome() {
        let line = TurnEvent::Done { outcome: None }.to_ndjson();
        assert_eq!(line, "{\"type\":\"done\"}\n");
        let parsed: TurnEvent = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(parsed, TurnEvent::Done { outcome: None });
    }
}
