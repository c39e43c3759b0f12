//! Weft Server - REST API for the Weft component registry.
//!
//! Exposes component publication and dependency-tree resolution over HTTP.
//! The resolver and graph/blob store collaborators come from `weft-core`;
//! this crate only adds the transport, auth, and documentation layers.

use std::sync::Arc;

use utoipa::OpenApi;
use weft_core::{DependencyResolver, InMemoryGraphStore};

pub mod handlers;
pub mod middleware;
pub mod types;

pub use handlers::{health_check, list_components, publish_component, resolve_bundle};
pub use middleware::api_key_auth;

/// Shared server state.
pub struct AppState {
    /// The dependency resolver over the configured collaborators.
    pub resolver: DependencyResolver,
    /// The in-memory graph store, when it backs the resolver; publication
    /// endpoints write through this handle. `None` with a remote store.
    pub registry: Option<Arc<InMemoryGraphStore>>,
    /// API key required by the auth middleware, if configured.
    pub api_key: Option<String>,
}

/// OpenAPI document for the Weft REST API.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::components::publish_component,
        handlers::components::list_components,
        handlers::resolve::resolve_bundle,
    ),
    components(schemas(
        types::ComponentRef,
        types::PublishComponentRequest,
        types::PublishDependency,
        types::ResolveRequest,
        types::ResolveData,
        types::FileWithRegistry,
        types::ResolveResponse,
        types::ErrorResponse,
    )),
    tags(
        (name = "components", description = "Component publication"),
        (name = "resolve", description = "Dependency-tree resolution"),
        (name = "health", description = "Liveness probes")
    )
)]
pub struct ApiDoc;
