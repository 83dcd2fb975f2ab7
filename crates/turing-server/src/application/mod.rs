//! Application Layer (Use Cases)
//!
//! Orchestrates domain operations and coordinates between
//! repositories and external services.

pub mod inspection;
mod orchestrator;

pub use inspection::inspection_prompt;
pub use orchestrator::TurnOrchestrator;
