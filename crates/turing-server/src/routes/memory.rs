//! Memory Routes - Inspect and reset the session memory store

use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Json, Router,
};

use turing::models::{HistoryQuery, MemoryResponse, SearchMemoriesRequest, WipeResponse};
use turing::{DomainError, MemoryStore, DEFAULT_RETRIEVAL_LIMIT};

use super::{api_error, ApiError};
use crate::AppState;

const DEFAULT_HISTORY_LIMIT: usize = 50;

/// Chronological history of a session
#[utoipa::path(
    get,
    path = "/turing/sessions/{session_id}/memories",
    params(
        ("session_id" = String, Path, description = "Conversation session"),
        HistoryQuery
    ),
    responses(
        (status = 200, description = "Records, oldest first", body = Vec<MemoryResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Memory"
)]
pub async fn list_memories(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<MemoryResponse>>, ApiError> {
    let records = state
        .orchestrator
        .store()
        .history(&session_id, query.limit.unwrap_or(DEFAULT_HISTORY_LIMIT))
        .await
        .map_err(api_error)?;

    Ok(Json(records.into_iter().map(MemoryResponse::from).collect()))
}

/// Semantic search within a session
#[utoipa::path(
    post,
    path = "/turing/sessions/{session_id}/memories/search",
    params(
        ("session_id" = String, Path, description = "Conversation session")
    ),
    request_body = SearchMemoriesRequest,
    responses(
        (status = 200, description = "Closest records first", body = Vec<MemoryResponse>),
        (status = 400, description = "Empty query"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Memory"
)]
pub async fn search_memories(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(payload): Json<SearchMemoriesRequest>,
) -> Result<Json<Vec<MemoryResponse>>, ApiError> {
    if payload.query.trim().is_empty() {
        return Err(api_error(DomainError::empty_text("query")));
    }

    let results = state
        .orchestrator
        .store()
        .search(
            &session_id,
            &payload.query,
            payload.limit.unwrap_or(DEFAULT_RETRIEVAL_LIMIT),
        )
        .await
        .map_err(api_error)?;

    Ok(Json(results.into_iter().map(MemoryResponse::from).collect()))
}

/// Destroy every memory in every session
#[utoipa::path(
    delete,
    path = "/turing/memories",
    responses(
        (status = 200, description = "Store wiped", body = WipeResponse),
        (status = 500, description = "Internal server error")
    ),
    tag = "Memory"
)]
pub async fn wipe_memories(State(state): State<AppState>) -> Result<Json<WipeResponse>, ApiError> {
    let store = state.orchestrator.store();
    let removed = store.count().await.map_err(api_error)?;
    store.wipe().await.map_err(api_error)?;

    Ok(Json(WipeResponse {
        wiped: true,
        removed,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/turing/sessions/:session_id/memories", get(list_memories))
        .route(
            "/turing/sessions/:session_id/memories/search",
            post(search_memories),
        )
        .route("/turing/memories", delete(wipe_memories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::tests::{body_json, post_json, send};
    use crate::test_support::{app_state, ScriptedGeneration};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use std::sync::Arc;
    use turing::Role;

    #[tokio::test]
    async fn test_history_search_and_wipe() {
        let (state, _dir) = app_state(Arc::new(ScriptedGeneration::new(&["ok"]))).await;
        let store = state.orchestrator.store().clone();
        store.save("s1", Role::User, "My name is Ada").await.unwrap();
        store.save("s1", Role::Assistant, "Noted, Ada.").await.unwrap();
        store.save("s2", Role::User, "unrelated").await.unwrap();

        let response = send(
            crate::routes::app(state.clone()),
            Request::get("/turing/sessions/s1/memories?limit=10")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let history: Vec<MemoryResponse> = body_json(response).await;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].text, "My name is Ada");
        assert!(history[0].distance.is_none());

        let response = post_json(
            crate::routes::app(state.clone()),
            "/turing/sessions/s1/memories/search",
            serde_json::json!({ "query": "what is my name", "limit": 1 }),
        )
        .await;
        let hits: Vec<MemoryResponse> = body_json(response).await;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "My name is Ada");
        assert!(hits[0].distance.is_some());

        let response = send(
            crate::routes::app(state.clone()),
            Request::delete("/turing/memories").body(Body::empty()).unwrap(),
        )
        .await;
        let wiped: WipeResponse = body_json(response).await;
        assert!(wiped.wiped);
        assert_eq!(wiped.removed, 3);
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_blank_search_rejected() {
        let (state, _dir) = app_state(Arc::new(ScriptedGeneration::new(&["ok"]))).await;
        let response = post_json(
            crate::routes::app(state),
            "/turing/sessions/s1/memories/search",
            serde_json::json!({ "query": "" }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
