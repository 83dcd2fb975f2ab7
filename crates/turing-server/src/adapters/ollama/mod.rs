//! Ollama Adapters
//!
//! Chat generation and embeddings against a local Ollama daemon.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use turing::DomainError;

mod embedding;
mod generation;

pub use embedding::OllamaEmbedding;
pub use generation::OllamaClient;

const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagEntry>,
}

#[derive(Deserialize)]
struct TagEntry {
    name: String,
}

/// Names reported by `/api/tags`. Any failure means the service is unusable.
async fn installed_models(client: &Client, base_url: &str) -> Result<Vec<String>, DomainError> {
    let response = client
        .get(format!("{}/api/tags", base_url))
        .timeout(PROBE_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            DomainError::ServiceUnavailable(format!(
                "Ollama is not reachable at {}: {}",
                base_url, e
            ))
        })?;

    if !response.status().is_success() {
        return Err(DomainError::ServiceUnavailable(format!(
            "Ollama at {} answered {}",
            base_url,
            response.status()
        )));
    }

    let tags: TagsResponse = response
        .json()
        .await
        .map_err(|e| DomainError::ServiceUnavailable(e.to_string()))?;

    Ok(tags.models.into_iter().map(|m| m.name).collect())
}

/// `qwen2.5` matches the `qwen2.5:latest` tag
fn model_matches(installed: &str, wanted: &str) -> bool {
    installed == wanted
        || installed
            .strip_suffix(":latest")
            .is_some_and(|base| base == wanted)
}
