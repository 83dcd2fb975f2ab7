//! Fragment - One incremental piece of a streamed response

use serde::{Deserialize, Serialize};

/// Prefix of every diagnostic produced in place of model output.
pub const SYSTEM_ERROR_PREFIX: &str = "[System Error]";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    pub text: String,
    /// Set when the fragment reports a transport failure instead of model text
    #[serde(default)]
    pub diagnostic: bool,
}

impl Fragment {
    pub fn token(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            diagnostic: false,
        }
    }

    /// Terminal fragment yielded when the stream breaks
    pub fn diagnostic(detail: impl std::fmt::Display) -> Self {
        Self {
            text: format!("{} {}", SYSTEM_ERROR_PREFIX, detail),
            diagnostic: true,
        }
    }
}

/// Sentinel returned by one-shot generation on failure
pub fn generation_failure(detail: impl std::fmt::Display) -> String {
    format!("{} Failed to compute response: {}", SYSTEM_ERROR_PREFIX, detail)
}
