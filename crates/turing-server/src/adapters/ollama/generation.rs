//! Ollama Generation Client
//!
//! Talks to `/api/chat` with the Turing persona as system message.
//! Streaming responses are newline-delimited JSON chunks of the form
//! `{"message":{"content":"..."},"done":false}`.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use turing::domain::generation_failure;
use turing::models::LineBuffer;
use turing::ports::services::persona_messages;
use turing::{ChatMessage, DomainError, Fragment, FragmentStream, GenerationClient, TuringConfig};

use super::{installed_models, model_matches};

#[derive(Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatBody<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// One NDJSON line (or the whole body when not streaming)
#[derive(Debug, Deserialize)]
struct ChatChunk {
    #[serde(default)]
    message: Option<ChunkMessage>,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChunkMessage {
    #[serde(default)]
    content: String,
}

impl OllamaClient {
    /// Build a client without touching the network
    pub fn new(config: &TuringConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.service.base_url.trim_end_matches('/').to_string(),
            model: config.model.active_llm.clone(),
            temperature: config.model.temperature,
        }
    }

    /// Build a client and verify the service answers.
    ///
    /// Invalid settings or an unreachable service are fatal. A model that is
    /// not pulled yet only warns, since Ollama reports that per request.
    pub async fn connect(config: &TuringConfig) -> Result<Self, DomainError> {
        config.validate()?;
        let client = Self::new(config);
        let installed = installed_models(&client.client, &client.base_url).await?;

        if installed.iter().any(|name| model_matches(name, &client.model)) {
            tracing::info!("🤖 Ollama ready at {} (model: {})", client.base_url, client.model);
        } else {
            tracing::warn!(
                "⚠️  Model '{}' not found in Ollama (installed: {}). Run `ollama pull {}`",
                client.model,
                installed.join(", "),
                client.model
            );
        }

        Ok(client)
    }

    fn body<'a>(&'a self, prompt: &str, stream: bool) -> ChatBody<'a> {
        ChatBody {
            model: &self.model,
            messages: persona_messages(prompt),
            stream,
            options: ChatOptions {
                temperature: self.temperature,
            },
        }
    }

    async fn send(&self, prompt: &str, stream: bool) -> Result<reqwest::Response, String> {
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&self.body(prompt, stream))
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(format!("Ollama API error ({}): {}", status, error_text));
        }

        Ok(response)
    }

    async fn try_generate(&self, prompt: &str) -> Result<String, String> {
        let response = self.send(prompt, false).await?;
        let chunk: ChatChunk = response.json().await.map_err(|e| e.to_string())?;
        if let Some(error) = chunk.error {
            return Err(error);
        }
        Ok(chunk.message.map(|m| m.content).unwrap_or_default())
    }
}

#[async_trait]
impl GenerationClient for OllamaClient {
    async fn generate(&self, prompt: &str) -> String {
        match self.try_generate(prompt).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!("Generation failed: {}", e);
                generation_failure(e)
            }
        }
    }

    fn stream(&self, prompt: &str) -> FragmentStream {
        let this = self.clone();
        let prompt = prompt.to_string();

        Box::pin(async_stream::stream! {
            let response = match this.send(&prompt, true).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!("Stream failed to open: {}", e);
                    yield Fragment::diagnostic(e);
                    return;
                }
            };

            let mut bytes = response.bytes_stream();
            let mut lines = LineBuffer::default();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(chunk) => chunk,
                    Err(e) => {
                        tracing::warn!("Stream interrupted: {}", e);
                        yield Fragment::diagnostic(e);
                        return;
                    }
                };

                for line in lines.push(&chunk) {
                    match parse_line(&line) {
                        Ok(parsed) => {
                            if !parsed.text.is_empty() {
                                yield Fragment::token(parsed.text);
                            }
                            if parsed.done {
                                return;
                            }
                        }
                        Err(e) => {
                            tracing::warn!("Stream aborted: {}", e);
                            yield Fragment::diagnostic(e);
                            return;
                        }
                    }
                }
            }

            if let Some(line) = lines.finish() {
                match parse_line(&line) {
                    Ok(parsed) => {
                        if !parsed.text.is_empty() {
                            yield Fragment::token(parsed.text);
                        }
                        if parsed.done {
                            return;
                        }
                    }
                    Err(e) => {
                        yield Fragment::diagnostic(e);
                        return;
                    }
                }
            }

            tracing::warn!("Stream ended without a done marker");
            yield Fragment::diagnostic("stream ended before the response was complete");
        })
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// What one NDJSON line contributes to the response
#[derive(Debug, Default, PartialEq)]
struct Parsed {
    text: String,
    done: bool,
}

fn parse_line(line: &str) -> Result<Parsed, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Parsed::default());
    }

    let chunk: ChatChunk =
        serde_json::from_str(line).map_err(|e| format!("malformed stream chunk: {}", e))?;

    if let Some(error) = chunk.error {
        return Err(error);
    }

    Ok(Parsed {
        text: chunk.message.map(|m| m.content).unwrap_or_default(),
        done: chunk.done,
    })
}
