//! Turn - One request/response cycle
//!
//! A turn is transient: only the two memory records it produces survive.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::entities::Fragment;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::TurnPhase;

/// Input for one orchestrated turn
#[derive(Debug, Clone)]
pub struct TurnRequest {
    pub session_id: String,
    /// What the user actually typed; this is what gets remembered
    pub user_text: String,
    /// Pre-composed system text appended before augmentation (e.g. file listings)
    pub injection: Option<String>,
}

impl TurnRequest {
    pub fn new(session_id: impl Into<String>, user_text: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_text: user_text.into(),
            injection: None,
        }
    }

    pub fn with_injection(mut self, injection: Option<String>) -> Self {
        self.injection = injection.filter(|text| !text.is_empty());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.session_id.trim().is_empty() {
            return Err(DomainError::empty_text("session id"));
        }
        if self.user_text.trim().is_empty() {
            return Err(DomainError::empty_text("user text"));
        }
        Ok(())
    }

    /// User text with the injection appended, as sent to the model
    pub fn outbound_text(&self) -> String {
        match &self.injection {
            Some(injection) => format!("{}{}", self.user_text, injection),
            None => self.user_text.clone(),
        }
    }
}

/// Mutable state of a running turn
#[derive(Debug)]
pub struct Turn {
    pub request: TurnRequest,
    pub augmented_prompt: String,
    pub context_used: bool,
    pub response: String,
    pub fragment_count: usize,
    pub phase: TurnPhase,
    failed: bool,
}

impl Turn {
    pub fn new(request: TurnRequest) -> Self {
        Self {
            request,
            augmented_prompt: String::new(),
            context_used: false,
            response: String::new(),
            fragment_count: 0,
            phase: TurnPhase::Idle,
            failed: false,
        }
    }

    pub fn enter(&mut self, phase: TurnPhase) {
        tracing::debug!(
            session_id = %self.request.session_id,
            from = %self.phase,
            to = %phase,
            "turn phase"
        );
        self.phase = phase;
    }

    /// Accumulate one delivered fragment
    pub fn absorb(&mut self, fragment: &Fragment) {
        self.response.push_str(&fragment.text);
        self.fragment_count += 1;
        if fragment.diagnostic {
            self.failed = true;
        }
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    pub fn into_outcome(self, persistence_warnings: Vec<String>) -> TurnOutcome {
        TurnOutcome {
            session_id: self.request.session_id,
            response: self.response,
            fragment_count: self.fragment_count,
            context_used: self.context_used,
            phase: if self.failed {
                TurnPhase::Failed
            } else {
                TurnPhase::Idle
            },
            persistence_warnings,
        }
    }
}

/// Summary of a finished turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TurnOutcome {
    pub session_id: String,
    /// Concatenation of every delivered fragment
    pub response: String,
    pub fragment_count: usize,
    /// Whether retrieved memory was injected into the prompt
    pub context_used: bool,
    /// `idle` on success, `failed` when the service broke the stream
    pub phase: TurnPhase,
    #[serde(default)]
    pub persistence_warnings: Vec<String>,
}
