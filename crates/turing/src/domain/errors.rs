//! Domain Errors
//!
//! Error types for memory, augmentation and generation operations.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    /// Malformed or missing configuration. Fatal at startup.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The generation service cannot be reached.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Reading from the memory store failed.
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Writing a memory record failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A turn is already running for this session.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("External service error: {0}")]
    ExternalService(String),
}

impl DomainError {
    pub fn empty_text<T: AsRef<str>>(what: T) -> Self {
        Self::Validation(format!("{} must not be empty", what.as_ref()))
    }

    pub fn session_busy(session_id: &str) -> Self {
        Self::Conflict(format!(
            "session '{}' already has a turn in progress",
            session_id
        ))
    }

    /// Whether this error must stop the process instead of a single call.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Configuration(_) | Self::ServiceUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(DomainError::Configuration("x".into()).is_fatal());
        assert!(DomainError::ServiceUnavailable("x".into()).is_fatal());
        assert!(!DomainError::Retrieval("x".into()).is_fatal());
        assert!(!DomainError::Persistence("x".into()).is_fatal());
        assert!(!DomainError::empty_text("user text").is_fatal());
    }

    #[test]
    fn test_session_busy_message() {
        let err = DomainError::session_busy("s1");
        assert_eq!(
            err.to_string(),
            "Conflict: session 's1' already has a turn in progress"
        );
    }
}
