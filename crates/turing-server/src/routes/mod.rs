//! Turing API Routes
//!
//! - /turing/sessions/:session_id/turns - Memory-augmented turns (NDJSON)
//! - /turing/generate, /turing/stream - Memory-free generation
//! - /turing/inspect - File and folder analysis (NDJSON)
//! - /turing/sessions/:session_id/memories - Session history and search
//! - /turing/memories - Wipe

use axum::{http::StatusCode, routing::get, Json, Router};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use turing::DomainError;

use crate::AppState;

pub mod generate;
pub mod inspect;
pub mod memory;
pub mod ndjson;
pub mod swagger;
pub mod turn;

pub type ApiError = (StatusCode, String);

pub fn api_error(e: DomainError) -> ApiError {
    let status = match &e {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, e.to_string())
}

#[derive(Serialize)]
struct HealthCheck {
    status: String,
    message: String,
    version: String,
}

async fn health_check() -> Json<HealthCheck> {
    Json(HealthCheck {
        status: "ok".to_string(),
        message: "Turing is running - memory online".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Full application router
pub fn app(state: AppState) -> Router {
    let openapi = swagger::ApiDoc::openapi();

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/health", get(health_check))
        .merge(turn::router())
        .merge(generate::router())
        .merge(inspect::router())
        .merge(memory::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::test_support::{app_state, ScriptedGeneration};
    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use serde::de::DeserializeOwned;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub async fn send(app: Router, request: Request<Body>) -> Response {
        app.oneshot(request).await.unwrap()
    }

    pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
        send(
            app,
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    pub async fn body_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    pub async fn body_lines<T: DeserializeOwned>(response: Response) -> Vec<T> {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(api_error(DomainError::empty_text("x")).0, StatusCode::BAD_REQUEST);
        assert_eq!(api_error(DomainError::session_busy("s1")).0, StatusCode::CONFLICT);
        assert_eq!(
            api_error(DomainError::ServiceUnavailable("down".into())).0,
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            api_error(DomainError::Persistence("disk".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (state, _dir) = app_state(Arc::new(ScriptedGeneration::new(&[]))).await;
        let response = send(
            app(state),
            Request::get("/health").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[test]
    fn test_openapi_lists_turn_route() {
        let doc = swagger::ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/turing/sessions/{session_id}/turns"));
        assert!(doc.paths.paths.contains_key("/turing/memories"));
    }
}
