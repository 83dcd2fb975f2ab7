//! Domain Services
//!
//! Pure functions over domain entities.

pub mod augmentation;
pub mod context;

pub use augmentation::augment_prompt;
pub use context::{cosine_distance, cosine_similarity, format_context, rank};
