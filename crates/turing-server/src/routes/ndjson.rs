//! NDJSON response bodies
//!
//! Each turn runs on its own task and reports through a channel; the
//! response body drains that channel one JSON line per event.

use axum::{
    body::Body,
    http::header,
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use std::convert::Infallible;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio_stream::wrappers::UnboundedReceiverStream;
use turing::models::TurnEvent;

use crate::adapters::ChannelSink;
use crate::AppState;

pub const NDJSON: &str = "application/x-ndjson";

pub fn ndjson_response(rx: UnboundedReceiver<TurnEvent>) -> Response {
    let lines =
        UnboundedReceiverStream::new(rx).map(|event| Ok::<_, Infallible>(event.to_ndjson()));
    ([(header::CONTENT_TYPE, NDJSON)], Body::from_stream(lines)).into_response()
}

/// Stream `prompt` without memory on a background task
pub fn spawn_ephemeral(state: &AppState, prompt: String) -> Response {
    let (tx, rx) = mpsc::unbounded_channel();
    let orchestrator = state.orchestrator.clone();

    tokio::spawn(async move {
        let mut sink = ChannelSink::new(tx);
        let event = match orchestrator.stream_ephemeral(&prompt, &mut sink).await {
            Ok(_) => TurnEvent::Done { outcome: None },
            Err(e) => TurnEvent::Error {
                message: e.to_string(),
            },
        };
        sink.finish(event);
    });

    ndjson_response(rx)
}
