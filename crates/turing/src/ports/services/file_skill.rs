//! Filesystem Skill Port
//!
//! Read-mostly access to the user's files. Results are plain text meant to be
//! pasted into prompts, so failures come back as `[System Error]` text too.

use async_trait::async_trait;

/// Maximum characters returned by [`FileSkill::read`]
pub const READ_LIMIT_CHARS: usize = 3000;

#[async_trait]
pub trait FileSkill: Send + Sync {
    /// Listing of a directory relative to the skill's base directory
    async fn list(&self, path: &str) -> String;

    /// Contents of a text file, truncated to [`READ_LIMIT_CHARS`]
    async fn read(&self, path: &str) -> String;

    /// Create or overwrite a file, returning a status line
    async fn write(&self, path: &str, content: &str) -> String;
}
