//! Generation Client Port
//!
//! Abstract interface for the text-completion service. Every call carries the
//! fixed Turing persona as its system message; callers only supply the prompt.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::domain::Fragment;

/// System persona prepended to every request
pub const PERSONA: &str = "You are Turing, the core intelligence layer of Turing AI OS. \
You are precise, helpful, and highly technical. \
You do not use fluff. You run locally, prioritizing user privacy and system efficiency.";

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Persona message followed by the prompt
pub fn persona_messages(prompt: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(PERSONA), ChatMessage::user(prompt)]
}

/// Lazy, finite, single-use sequence of fragments
pub type FragmentStream = BoxStream<'static, Fragment>;

/// Generation client interface
///
/// Implementations never fail a call: transport problems surface as a
/// sentinel string (`generate`) or a single diagnostic fragment (`stream`).
///
/// # Example
///
/// ```rust,ignore
/// use futures::StreamExt;
///
/// let mut fragments = client.stream("Hello");
/// while let Some(fragment) = fragments.next().await {
///     print!("{}", fragment.text);
/// }
/// ```
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Complete response for a prompt
    async fn generate(&self, prompt: &str) -> String;

    /// Incremental response; concatenating every fragment gives the full text
    fn stream(&self, prompt: &str) -> FragmentStream;

    /// Get the provider name (e.g., "ollama")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}
