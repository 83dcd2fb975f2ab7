//! Local filesystem skill
//!
//! Paths are joined onto a base directory (the home directory by default).

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use turing::domain::SYSTEM_ERROR_PREFIX;
use turing::ports::READ_LIMIT_CHARS;
use turing::FileSkill;

#[derive(Debug, Clone)]
pub struct LocalFileSkill {
    base_dir: PathBuf,
}

impl LocalFileSkill {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        if path.is_empty() {
            self.base_dir.clone()
        } else {
            self.base_dir.join(path)
        }
    }
}

/// Directory entry names in a stable order
pub async fn entry_names(dir: &Path) -> std::io::Result<Vec<String>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut names = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        names.push(entry.file_name().to_string_lossy().into_owned());
    }
    names.sort();
    Ok(names)
}

#[async_trait]
impl FileSkill for LocalFileSkill {
    async fn list(&self, path: &str) -> String {
        let target = self.resolve(path);
        match entry_names(&target).await {
            Ok(names) => format!("Contents of {}:\n{}", target.display(), names.join("\n")),
            Err(e) => format!("{} Cannot read directory: {}", SYSTEM_ERROR_PREFIX, e),
        }
    }

    async fn read(&self, path: &str) -> String {
        let target = self.resolve(path);
        match tokio::fs::read_to_string(&target).await {
            Ok(content) => {
                let content: String = content.chars().take(READ_LIMIT_CHARS).collect();
                format!("--- FILE CONTENTS ({}) ---\n{}", target.display(), content)
            }
            Err(e) => format!("{} Cannot read file: {}", SYSTEM_ERROR_PREFIX, e),
        }
    }

    async fn write(&self, path: &str, content: &str) -> String {
        let target = self.resolve(path);
        match tokio::fs::write(&target, content).await {
            Ok(()) => {
                tracing::info!("📝 File written to {}", target.display());
                format!("[Success] File written to {}", target.display())
            }
            Err(e) => format!("{} Cannot write file: {}", SYSTEM_ERROR_PREFIX, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_list_read_write() {
        let dir = tempfile::tempdir().unwrap();
        let skill = LocalFileSkill::new(dir.path());

        let status = skill.write("notes.txt", "hello").await;
        assert!(status.starts_with("[Success] File written to"));
        std::fs::create_dir(dir.path().join("src")).unwrap();

        let listing = skill.list("").await;
        assert!(listing.starts_with(&format!("Contents of {}:\n", dir.path().display())));
        assert!(listing.ends_with("notes.txt\nsrc"));

        let read = skill.read("notes.txt").await;
        assert!(read.starts_with("--- FILE CONTENTS ("));
        assert!(read.ends_with(") ---\nhello"));
    }

    #[tokio::test]
    async fn test_read_is_bounded() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("big.txt"), "é".repeat(READ_LIMIT_CHARS + 50)).unwrap();

        let skill = LocalFileSkill::new(dir.path());
        let read = skill.read("big.txt").await;
        let body = read.split_once(") ---\n").unwrap().1;
        assert_eq!(body.chars().count(), READ_LIMIT_CHARS);
    }

    #[tokio::test]
    async fn test_failures_are_text() {
        let dir = tempfile::tempdir().unwrap();
        let skill = LocalFileSkill::new(dir.path());

        assert!(skill.list("missing").await.starts_with("[System Error] Cannot read directory:"));
        assert!(skill.read("missing.txt").await.starts_with("[System Error] Cannot read file:"));
        assert!(skill
            .write("missing/dir/file.txt", "x")
            .await
            .starts_with("[System Error] Cannot write file:"));
    }
}
