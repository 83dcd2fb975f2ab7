//! Path inspection
//!
//! Turns a file or folder into an analysis prompt. The prompt is streamed
//! without memory, like spotlight queries.

use std::path::Path;
use turing::DomainError;

use crate::adapters::filesystem::entry_names;

/// Folder entries shown to the model
pub const MAX_FOLDER_ENTRIES: usize = 30;
/// File characters shown to the model
pub const MAX_FILE_CHARS: usize = 2000;

const FOLDER_PROMPT: &str =
    "Look at this folder structure and explain what kind of project or directory this likely is:";
const FILE_PROMPT: &str =
    "Please provide a concise summary and explain the purpose of the following file contents:";

pub async fn inspection_prompt(path: &Path) -> Result<String, DomainError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| {
        DomainError::Validation(format!("cannot inspect {}: {}", path.display(), e))
    })?;

    if metadata.is_dir() {
        let names = entry_names(path).await.map_err(|e| {
            DomainError::Validation(format!("cannot read folder {}: {}", path.display(), e))
        })?;
        let tree = names
            .iter()
            .take(MAX_FOLDER_ENTRIES)
            .map(|name| format!("- {}", name))
            .collect::<Vec<_>>()
            .join("\n");
        tracing::info!("👁️  Inspecting folder {} ({} entries)", path.display(), names.len());
        Ok(format!("{}\n\n{}", FOLDER_PROMPT, tree))
    } else {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            DomainError::Validation(format!("cannot read file {}: {}", path.display(), e))
        })?;
        let content: String = content.chars().take(MAX_FILE_CHARS).collect();
        tracing::info!("👁️  Inspecting file {}", path.display());
        Ok(format!("{}\n\n{}", FILE_PROMPT, content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_folder_prompt_lists_first_entries() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..40 {
            std::fs::write(dir.path().join(format!("f{:02}.txt", i)), "").unwrap();
        }

        let prompt = inspection_prompt(dir.path()).await.unwrap();
        assert!(prompt.starts_with(&format!("{}\n\n- f00.txt\n- f01.txt", FOLDER_PROMPT)));
        assert_eq!(prompt.matches("\n- ").count(), MAX_FOLDER_ENTRIES);
        assert!(prompt.ends_with("- f29.txt"));
    }

    #[tokio::test]
    async fn test_file_prompt_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("main.rs");
        std::fs::write(&file, "x".repeat(MAX_FILE_CHARS * 2)).unwrap();

        let prompt = inspection_prompt(&file).await.unwrap();
        let body = prompt.strip_prefix(&format!("{}\n\n", FILE_PROMPT)).unwrap();
        assert_eq!(body.len(), MAX_FILE_CHARS);
    }

    #[tokio::test]
    async fn test_missing_path_is_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspection_prompt(&dir.path().join("nope")).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }
}
