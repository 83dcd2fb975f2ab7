//! Turn Routes - Memory-augmented conversation
//!
//! The response is NDJSON: `fragment` lines in generation order, then one
//! `done` line carrying the outcome (or an `error` line).

use axum::{
    extract::{Path, State},
    response::Response,
    routing::post,
    Json, Router,
};
use tokio::sync::mpsc;

use turing::models::{ChatRequest, TurnEvent};
use turing::{DomainError, TurnRequest};

use super::ndjson::ndjson_response;
use super::{api_error, ApiError};
use crate::adapters::ChannelSink;
use crate::AppState;

/// Run one turn in a session
#[utoipa::path(
    post,
    path = "/turing/sessions/{session_id}/turns",
    params(
        ("session_id" = String, Path, description = "Conversation session")
    ),
    request_body = ChatRequest,
    responses(
        (status = 200, description = "NDJSON stream of turn events", body = TurnEvent, content_type = "application/x-ndjson"),
        (status = 400, description = "Empty message"),
        (status = 409, description = "Session already has a turn in progress")
    ),
    tag = "Turn"
)]
pub async fn run_turn(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> Result<Response, ApiError> {
    let request = TurnRequest::new(session_id, payload.message);
    request.validate().map_err(api_error)?;

    if state.orchestrator.is_busy(&request.session_id) {
        return Err(api_error(DomainError::session_busy(&request.session_id)));
    }

    let injection = if payload.no_injection {
        None
    } else {
        state.injection.inject(&request.user_text).await
    };
    let request = request.with_injection(injection);

    let (tx, rx) = mpsc::unbounded_channel();
    let orchestrator = state.orchestrator.clone();

    tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        let event = match orchestrator.run(request, &mut sink).await {
            Ok(outcome) => TurnEvent::Done {
                outcome: Some(outcome),
            },
            Err(e) => {
                tracing::warn!("Turn rejected: {}", e);
                TurnEvent::Error {
                    message: e.to_string(),
                }
            }
        };
        sink.finish(event);
    });

    Ok(ndjson_response(rx))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/turing/sessions/:session_id/turns", post(run_turn))
}
