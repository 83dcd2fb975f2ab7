//! Turing Domain Library
//!
//! Core domain types and interfaces for the Turing assistant shell.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain/`): Pure business entities and logic
//!   - `entities/`: Core domain models (MemoryRecord, Fragment, Turn)
//!   - `value_objects/`: Immutable value types (Role, TurnPhase)
//!   - `services/`: Pure functions (prompt augmentation, context ranking)
//!   - `errors/`: Domain-specific error types
//!
//! - **Ports** (`ports/`): Abstract interfaces (traits)
//!   - `repositories/`: The session-scoped memory store
//!   - `services/`: Generation, embedding, filesystem and injection interfaces
//!   - `sink`: Where streamed fragments are delivered
//!
//! - **Models** (`models/`): Wire types shared by `turingd` and its clients
//! - **Config** (`config`): Daemon configuration file and env overrides
//!
//! # Usage
//!
//! ```rust,ignore
//! use turing::domain::services::augment_prompt;
//! use turing::ports::{GenerationClient, MemoryStore};
//! ```

pub mod config;
pub mod domain;
pub mod models;
pub mod ports;

// Re-export commonly used types
pub use config::{EmbeddingProvider, TuringConfig};
pub use domain::{
    DomainError, Fragment, MemoryRecord, Role, ScoredRecord, Turn, TurnOutcome, TurnPhase,
    TurnRequest,
};
pub use ports::{
    ChatMessage, EmbeddingService, FileSkill, FragmentSink, FragmentStream, GenerationClient,
    InjectionStrategy, MemoryStore, MessageRole, NoInjection, NullSink, DEFAULT_RETRIEVAL_LIMIT,
    PERSONA,
};
