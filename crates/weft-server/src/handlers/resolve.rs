//! Dependency resolution handler.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use weft_core::{ComponentIdentity, Error};

use crate::types::{ResolveRequest, ResolveResponse};
use crate::AppState;

/// Resolve a set of root components into a merged source bundle.
///
/// The response envelope always carries exactly one of `data`/`error`; a
/// single failed dependency fetch fails the whole resolution.
#[utoipa::path(
    post,
    path = "/resolve",
    tag = "resolve",
    request_body = ResolveRequest,
    responses(
        (status = 200, description = "Merged source bundle", body = ResolveResponse),
        (status = 400, description = "Invalid root identities", body = ResolveResponse),
        (status = 502, description = "Graph query or blob fetch failed", body = ResolveResponse)
    )
)]
pub async fn resolve_bundle(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResolveRequest>,
) -> impl IntoResponse {
    if req.components.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ResolveResponse::err("components must be non-empty".to_string())),
        );
    }

    let mut roots = Vec::with_capacity(req.components.len());
    for c in &req.components {
        match ComponentIdentity::new(&c.author, &c.slug) {
            Ok(id) => roots.push(id),
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ResolveResponse::err(e.to_string())),
                )
            }
        }
    }

    match state
        .resolver
        .resolve(&roots, req.with_demo_dependencies)
        .await
    {
        Ok(bundle) => {
            tracing::debug!(files = bundle.len(), "resolution succeeded");
            (StatusCode::OK, Json(ResolveResponse::ok(bundle.into())))
        }
        Err(e) => {
            tracing::warn!(error = %e, "resolution failed");
            (status_for(&e), Json(ResolveResponse::err(e.to_string())))
        }
    }
}

/// Maps resolution errors onto response statuses.
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidIdentity(_) => StatusCode::BAD_REQUEST,
        Error::GraphQuery(_)
        | Error::BlobFetch { .. }
        | Error::BlobUnavailable { .. }
        | Error::Http(_) => StatusCode::BAD_GATEWAY,
        Error::Json(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
