//! API key authentication middleware for the Weft server.
//!
//! When an API key is configured, all requests (except `/health` and the
//! docs endpoints) must include a valid `Authorization: Bearer <key>` or
//! `X-Api-Key: <key>` header. With no key configured, authentication is
//! disabled (development mode).

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::AppState;

/// Paths that bypass authentication (health checks, docs).
const BYPASS_PATHS: &[&str] = &["/health", "/swagger-ui", "/api-docs"];

/// API key authentication middleware.
///
/// Checks `Authorization: Bearer <key>` or `X-Api-Key: <key>` headers.
/// Skips authentication for health/docs endpoints and when no API key is
/// configured on the server state.
pub async fn api_key_auth(
    State(state): State<Arc<AppState>>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, impl IntoResponse> {
    // No API key configured → development mode, skip auth
    let Some(ref expected_key) = state.api_key else {
        return Ok(next.run(request).await);
    };

    // Skip auth for bypass paths
    let path = request.uri().path();
    if BYPASS_PATHS.iter().any(|bp| path.starts_with(bp)) {
        return Ok(next.run(request).await);
    }

    // Check Authorization: Bearer <key>
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));

    // Check X-Api-Key: <key>
    let api_key_header = request
        .headers()
        .get("x-api-key")
        .and_then(|v| v.to_str().ok());

    let provided_key = auth_header.or(api_key_header);

    match provided_key {
        Some(key) if key == expected_key => Ok(next.run(request).await),
        Some(_) => Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "Invalid API key"
            })),
        )),
        None => Err((
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({
                "error": "Missing API key. Set Authorization: Bearer <key> or X-Api-Key: <key>"
            })),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, middleware, routing::get, Router};
    use tower::ServiceExt;
    use weft_core::{DependencyResolver, HttpBlobStore, InMemoryGraphStore};

    async fn test_handler() -> &'static str {
        "ok"
    }

    fn build_app(api_key: Option<&str>) -> Router {
        let state = Arc::new(AppState {
            resolver: DependencyResolver::new(
                Arc::new(InMemoryGraphStore::new()),
                Arc::new(HttpBlobStore::new()),
            ),
            registry: None,
            api_key: api_key.map(str::to_string),
        });
        Router::new()
            .route("/components", get(test_handler))
            .route("/health", get(test_handler))
            .layer(middleware::from_fn_with_state(state, api_key_auth))
    }

    #[tokio::test]
    async fn test_no_api_key_allows_all() {
        let app = build_app(None);
        let req = Request::builder()
            .uri("/components")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_health_bypasses_auth() {
        let app = build_app(Some("test-key-123"));
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_key_returns_401() {
        let app = build_app(Some("test-key-456"));
        let req = Request::builder()
            .uri("/components")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_bearer_token() {
        let app = build_app(Some("test-key-789"));
        let req = Request::builder()
            .uri("/components")
            .header("Authorization", "Bearer test-key-789")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_valid_x_api_key() {
        let app = build_app(Some("test-key-abc"));
        let req = Request::builder()
            .uri("/components")
            .header("x-api-key", "test-key-abc")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_invalid_key_returns_401() {
        let app = build_app(Some("correct-key"));
        let req = Request::builder()
            .uri("/components")
            .header("Authorization", "Bearer wrong-key")
            .body(Body::empty())
            .unwrap();

        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
