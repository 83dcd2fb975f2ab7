//! Turing API Client

use anyhow::{bail, Context, Result};
use futures::StreamExt;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;

use turing::models::{
    ChatRequest, GenerateResponse, InspectRequest, LineBuffer, MemoryResponse, PromptRequest,
    SearchMemoriesRequest, TurnEvent, WipeResponse,
};

/// API Client for the Turing daemon
pub struct TuringClient {
    client: Client,
    base_url: String,
}

impl TuringClient {
    /// Create a new API client
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Test connection with health check
    pub async fn health(&self) -> Result<bool> {
        let url = format!("{}/health", self.base_url);
        let resp = self.client.get(&url).send().await?;
        Ok(resp.status().is_success())
    }

    /// Run one turn, calling `on_event` for every streamed event
    pub async fn turn<F>(
        &self,
        session_id: &str,
        message: &str,
        no_injection: bool,
        on_event: F,
    ) -> Result<()>
    where
        F: FnMut(TurnEvent),
    {
        let url = format!(
            "{}/turing/sessions/{}/turns",
            self.base_url,
            urlencoding::encode(session_id)
        );
        let request = ChatRequest {
            message: message.to_string(),
            no_injection,
        };

        let resp = self.post(&url, &request).await?;
        read_events(resp, on_event).await
    }

    /// Memory-free streamed generation
    pub async fn stream<F>(&self, prompt: &str, on_event: F) -> Result<()>
    where
        F: FnMut(TurnEvent),
    {
        let url = format!("{}/turing/stream", self.base_url);
        let request = PromptRequest {
            prompt: prompt.to_string(),
        };

        let resp = self.post(&url, &request).await?;
        read_events(resp, on_event).await
    }

    /// One-shot generation
    pub async fn generate(&self, prompt: &str) -> Result<GenerateResponse> {
        let url = format!("{}/turing/generate", self.base_url);
        let request = PromptRequest {
            prompt: prompt.to_string(),
        };

        let resp = self.post(&url, &request).await?;
        parse_json(resp).await
    }

    /// Explain a file or folder
    pub async fn inspect<F>(&self, path: &str, on_event: F) -> Result<()>
    where
        F: FnMut(TurnEvent),
    {
        let url = format!("{}/turing/inspect", self.base_url);
        let request = InspectRequest {
            path: path.to_string(),
        };

        let resp = self.post(&url, &request).await?;
        read_events(resp, on_event).await
    }

    /// Session history, oldest first
    pub async fn history(&self, session_id: &str, limit: usize) -> Result<Vec<MemoryResponse>> {
        let url = format!(
            "{}/turing/sessions/{}/memories?limit={}",
            self.base_url,
            urlencoding::encode(session_id),
            limit
        );
        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to connect to Turing daemon")?;

        parse_json(check(resp).await?).await
    }

    /// Search memories
    pub async fn search_memories(
        &self,
        session_id: &str,
        query: &str,
        limit: Option<usize>,
    ) -> Result<Vec<MemoryResponse>> {
        let url = format!(
            "{}/turing/sessions/{}/memories/search",
            self.base_url,
            urlencoding::encode(session_id)
        );
        let request = SearchMemoriesRequest {
            query: query.to_string(),
            limit,
        };

        let resp = self.post(&url, &request).await?;
        parse_json(resp).await
    }

    /// Destroy all memories
    pub async fn wipe(&self) -> Result<WipeResponse> {
        let url = format!("{}/turing/memories", self.base_url);
        let resp = self
            .client
            .delete(&url)
            .send()
            .await
            .context("Failed to connect to Turing daemon")?;

        parse_json(check(resp).await?).await
    }

    async fn post<T: serde::Serialize>(&self, url: &str, body: &T) -> Result<Response> {
        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .context("Failed to connect to Turing daemon. Is turingd running?")?;

        check(resp).await
    }
}

async fn check(resp: Response) -> Result<Response> {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        bail!("API error ({}): {}", status, body);
    }
    Ok(resp)
}

async fn parse_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    resp.json().await.context("Failed to parse response")
}

/// Decode an NDJSON body line by line
async fn read_events<F>(resp: Response, mut on_event: F) -> Result<()>
where
    F: FnMut(TurnEvent),
{
    let mut bytes = resp.bytes_stream();
    let mut lines = LineBuffer::default();

    while let Some(chunk) = bytes.next().await {
        let chunk = chunk.context("Stream interrupted")?;
        for line in lines.push(&chunk) {
            if let Some(event) = decode_line(&line)? {
                on_event(event);
            }
        }
    }

    if let Some(line) = lines.finish() {
        if let Some(event) = decode_line(&line)? {
            on_event(event);
        }
    }
    Ok(())
}

fn decode_line(line: &str) -> Result<Option<TurnEvent>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let event = serde_json::from_str(line)
        .with_context(|| format!("Malformed event line: {}", line))?;
    Ok(Some(event))
}
