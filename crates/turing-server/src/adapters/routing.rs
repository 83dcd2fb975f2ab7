//! Keyword routing for file listings
//!
//! Messages asking "what files" or to "list" something get a directory listing
//! appended as a system override before augmentation.

use async_trait::async_trait;
use std::sync::Arc;
use turing::{FileSkill, InjectionStrategy};

const TRIGGERS: &[&str] = &["what files", "list"];

pub struct KeywordFileRouting {
    skill: Arc<dyn FileSkill>,
    known_folders: Vec<String>,
}

impl KeywordFileRouting {
    pub fn new(skill: Arc<dyn FileSkill>, known_folders: Vec<String>) -> Self {
        Self {
            skill,
            known_folders,
        }
    }

    /// Folder to list for this message, `""` for the base directory
    fn target<'a>(&'a self, lowered: &str) -> &'a str {
        self.known_folders
            .iter()
            .find(|folder| lowered.contains(&folder.to_lowercase()))
            .map(String::as_str)
            .unwrap_or("")
    }
}

pub fn override_text(path: &str, listing: &str) -> String {
    format!(
        "\n\n[SYSTEM OVERRIDE]: You are the Turing AI OS. You HAVE successfully scanned the user's hard drive. \
Here is the raw data from the '{}' directory:\n```\n{}\n```\n\
INSTRUCTION: Describe these files to the user as if you just looked at them.",
        path, listing
    )
}

#[async_trait]
impl InjectionStrategy for KeywordFileRouting {
    async fn inject(&self, user_text: &str) -> Option<String> {
        let lowered = user_text.to_lowercase();
        if !TRIGGERS.iter().any(|t| lowered.contains(t)) {
            return None;
        }

        let path = self.target(&lowered);
        tracing::info!("📂 File routing triggered (path: '{}')", path);
        let listing = self.skill.list(path).await;
        Some(override_text(path, &listing))
    }
}
