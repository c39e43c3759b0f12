//! Component publication handlers.
//!
//! Publishing writes into the in-memory graph store; when the server fronts
//! a remote graph store these endpoints reject, since the remote store owns
//! the graph.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;

use weft_core::graph::{ComponentRecord, DependencyLink};
use weft_core::ComponentIdentity;

use crate::types::{ErrorResponse, PublishComponentRequest};
use crate::AppState;

/// Publish (or re-publish) a component.
#[utoipa::path(
    post,
    path = "/components",
    tag = "components",
    request_body = PublishComponentRequest,
    responses(
        (status = 201, description = "Component published", body = Object),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn publish_component(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PublishComponentRequest>,
) -> impl IntoResponse {
    let Some(ref registry_store) = state.registry else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "publishing requires the in-memory graph backend".to_string(),
            }),
        )
            .into_response();
    };

    let identity = match ComponentIdentity::new(&req.author, &req.slug) {
        Ok(id) => id,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    };

    let mut links = Vec::with_capacity(req.dependencies.len());
    for dep in &req.dependencies {
        match ComponentIdentity::new(&dep.author, &dep.slug) {
            Ok(target) => {
                let link = DependencyLink::new(target);
                links.push(if dep.demo_only { link.demo_only() } else { link });
            }
            Err(e) => {
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse {
                        error: e.to_string(),
                    }),
                )
                    .into_response()
            }
        }
    }

    let component = identity.to_string();
    registry_store.publish(ComponentRecord {
        identity,
        registry: req.registry,
        blob_uri: req.code_uri,
        npm_dependencies: req.npm_dependencies,
        links,
    });

    tracing::info!(%component, "component published");

    (
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Component published",
            "component": component
        })),
    )
        .into_response()
}

/// List published components.
#[utoipa::path(
    get,
    path = "/components",
    tag = "components",
    responses(
        (status = 200, description = "Published component identities", body = Object),
        (status = 400, description = "Remote graph backend", body = ErrorResponse)
    )
)]
pub async fn list_components(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(ref registry_store) = state.registry else {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "listing requires the in-memory graph backend".to_string(),
            }),
        )
            .into_response();
    };

    let mut components: Vec<String> = registry_store
        .identities()
        .iter()
        .map(ToString::to_string)
        .collect();
    components.sort();

    Json(serde_json::json!({ "components": components })).into_response()
}
