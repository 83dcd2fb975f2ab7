//! Inspect Routes - Explain a file or folder

use axum::{extract::State, response::Response, routing::post, Json, Router};
use std::path::Path;

use turing::models::{InspectRequest, TurnEvent};
use turing::DomainError;

use super::ndjson::spawn_ephemeral;
use super::{api_error, ApiError};
use crate::application::inspection_prompt;
use crate::AppState;

/// Inspect a path
#[utoipa::path(
    post,
    path = "/turing/inspect",
    request_body = InspectRequest,
    responses(
        (status = 200, description = "NDJSON stream of the analysis", body = TurnEvent, content_type = "application/x-ndjson"),
        (status = 400, description = "Path missing or unreadable")
    ),
    tag = "Generate"
)]
pub async fn inspect(
    State(state): State<AppState>,
    Json(payload): Json<InspectRequest>,
) -> Result<Response, ApiError> {
    if payload.path.trim().is_empty() {
        return Err(api_error(DomainError::empty_text("path")));
    }
    let prompt = inspection_prompt(Path::new(&payload.path))
        .await
        .map_err(api_error)?;
    Ok(spawn_ephemeral(&state, prompt))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/turing/inspect", post(inspect))
}
