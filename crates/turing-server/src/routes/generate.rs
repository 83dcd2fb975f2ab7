//! Generation Routes - Memory-free prompts
//!
//! Spotlight-style queries: nothing is retrieved and nothing is remembered.

use axum::{extract::State, response::Response, routing::post, Json, Router};

use turing::models::{GenerateResponse, PromptRequest, TurnEvent};
use turing::DomainError;

use super::ndjson::spawn_ephemeral;
use super::{api_error, ApiError};
use crate::AppState;

/// One-shot generation
#[utoipa::path(
    post,
    path = "/turing/generate",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "Full response text", body = GenerateResponse),
        (status = 400, description = "Empty prompt")
    ),
    tag = "Generate"
)]
pub async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<PromptRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let response = state
        .orchestrator
        .generate(&payload.prompt)
        .await
        .map_err(api_error)?;

    Ok(Json(GenerateResponse {
        response,
        model: state.orchestrator.client().model_id().to_string(),
    }))
}

/// Streamed generation
#[utoipa::path(
    post,
    path = "/turing/stream",
    request_body = PromptRequest,
    responses(
        (status = 200, description = "NDJSON stream of fragments", body = TurnEvent, content_type = "application/x-ndjson"),
        (status = 400, description = "Empty prompt")
    ),
    tag = "Generate"
)]
pub async fn stream(
    State(state): State<AppState>,
    Json(payload): Json<PromptRequest>,
) -> Result<Response, ApiError> {
    if payload.prompt.trim().is_empty() {
        return Err(api_error(DomainError::empty_text("prompt")));
    }
    Ok(spawn_ephemeral(&state, payload.prompt))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/turing/generate", post(generate))
        .route("/turing/stream", post(stream))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::{body_json, body_lines, post_json};
    use crate::test_support::{app_state, ScriptedGeneration};
    use axum::http::StatusCode;
    use std::sync::Arc;
    use turing::MemoryStore;

    #[tokio::test]
    async fn test_generate_returns_model() {
        let (state, _dir) = app_state(Arc::new(ScriptedGeneration::new(&["4"]))).await;

        let response = post_json(
            crate::routes::app(state),
            "/turing/generate",
            serde_json::json!({ "prompt": "2+2?" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: GenerateResponse = body_json(response).await;
        assert_eq!(body.response, "4");
        assert_eq!(body.model, "scripted-1");
    }

    #[tokio::test]
    async fn test_stream_is_memory_free() {
        let (state, _dir) = app_state(Arc::new(ScriptedGeneration::new(&["a", "b"]))).await;

        let response = post_json(
            crate::routes::app(state.clone()),
            "/turing/stream",
            serde_json::json!({ "prompt": "hello" }),
        )
        .await;
        let events: Vec<TurnEvent> = body_lines(response).await;
        assert_eq!(
            events,
            vec![
                TurnEvent::fragment("a"),
                TurnEvent::fragment("b"),
                TurnEvent::Done { outcome: None },
            ]
        );
        assert_eq!(state.orchestrator.store().count().await.unwrap(), 0);
    }
}
