//! Ollama Embedding - Vectors from `/api/embed`

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use turing::{DomainError, EmbeddingService, TuringConfig};

use super::{installed_models, model_matches};

#[derive(Clone)]
pub struct OllamaEmbedding {
    client: Client,
    base_url: String,
    model: String,
    dimensions: usize,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

impl OllamaEmbedding {
    /// Check that the embedding model is installed and learn its vector size.
    ///
    /// A missing model is a configuration error: recall would fail on every turn.
    pub async fn connect(config: &TuringConfig) -> Result<Self, DomainError> {
        let mut embedder = Self {
            client: Client::new(),
            base_url: config.service.base_url.trim_end_matches('/').to_string(),
            model: config.embedding.model.clone(),
            dimensions: 0,
        };

        let installed = installed_models(&embedder.client, &embedder.base_url).await?;
        if !installed.iter().any(|name| model_matches(name, &embedder.model)) {
            return Err(DomainError::Configuration(format!(
                "embedding model '{}' is not installed in Ollama. Run `ollama pull {}` \
                 or set embedding.provider = \"hashing\"",
                embedder.model, embedder.model
            )));
        }

        embedder.dimensions = embedder.request("dimension probe").await?.len();
        if embedder.dimensions == 0 {
            return Err(DomainError::Configuration(format!(
                "embedding model '{}' returned an empty vector",
                embedder.model
            )));
        }

        tracing::info!(
            "🧬 Ollama embedder ready ({}, {} dims)",
            embedder.model,
            embedder.dimensions
        );
        Ok(embedder)
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let request = EmbedRequest {
            model: &self.model,
            input: text,
        };

        let response = self
            .client
            .post(format!("{}/api/embed", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(DomainError::ExternalService(format!(
                "Ollama embed error ({}): {}",
                status, error_text
            )));
        }

        let body: EmbedResponse = response
            .json()
            .await
            .map_err(|e| DomainError::ExternalService(e.to_string()))?;

        body.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::ExternalService("No embedding returned".to_string()))
    }
}

#[async_trait]
impl EmbeddingService for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let embedding = self.request(text).await?;
        if embedding.len() != self.dimensions {
            return Err(DomainError::ExternalService(format!(
                "'{}' returned {} dims, expected {}",
                self.model,
                embedding.len(),
                self.dimensions
            )));
        }
        Ok(embedding)
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve;
    use axum::routing::{get, post};
    use axum::{Json, Router};
    use serde_json::json;

    fn ollama(installed: &'static str) -> Router {
        Router::new()
            .route(
                "/api/tags",
                get(move || async move { Json(json!({ "models": [{ "name": installed }] })) }),
            )
            .route(
                "/api/embed",
                post(|| async { Json(json!({ "embeddings": [[0.6, 0.8, 0.0]] })) }),
            )
    }

    async fn config_for(router: Router) -> TuringConfig {
        let mut config = TuringConfig::default();
        config.service.base_url = serve(router).await;
        config
    }

    #[tokio::test]
    async fn test_connect_learns_dimensions() {
        let config = config_for(ollama("nomic-embed-text:latest")).await;
        let embedder = OllamaEmbedding::connect(&config).await.unwrap();

        assert_eq!(embedder.name(), "nomic-embed-text");
        assert_eq!(embedder.dimensions(), 3);
        assert_eq!(embedder.embed("hello").await.unwrap(), vec![0.6, 0.8, 0.0]);
    }

    #[tokio::test]
    async fn test_missing_model_is_configuration_error() {
        let config = config_for(ollama("all-minilm:latest")).await;
        let err = OllamaEmbedding::connect(&config).await.err().unwrap();

        assert!(matches!(err, DomainError::Configuration(_)));
        assert!(err.to_string().contains("ollama pull nomic-embed-text"));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_fatal() {
        let mut config = TuringConfig::default();
        config.service.base_url = "http://127.0.0.1:9".to_string();

        let err = OllamaEmbedding::connect(&config).await.err().unwrap();
        assert!(err.is_fatal());
    }
}
