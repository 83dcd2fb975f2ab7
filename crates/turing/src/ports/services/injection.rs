//! Injection Strategy Port
//!
//! Decides whether a user message should carry extra system text (such as a
//! directory listing) before augmentation. The core only appends what a
//! strategy returns; the routing rules themselves are pluggable.

use async_trait::async_trait;

#[async_trait]
pub trait InjectionStrategy: Send + Sync {
    /// Text to append to `user_text`, or `None` to leave it alone
    async fn inject(&self, user_text: &str) -> Option<String>;
}

/// Strategy that never injects anything
pub struct NoInjection;

#[async_trait]
impl InjectionStrategy for NoInjection {
    async fn inject(&self, _user_text: &str) -> Option<String> {
        None
    }
}
