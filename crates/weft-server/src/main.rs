//! Weft Server - REST API for the Weft component registry.

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use weft_core::{
    DependencyResolver, GraphBackend, GraphStore, HttpBlobStore, HttpGraphStore,
    InMemoryGraphStore, WeftConfig,
};
use weft_server::{
    api_key_auth, health_check, list_components, publish_component, resolve_bundle, AppState,
};

/// Weft Server - dependency resolution for a UI component registry
#[derive(Parser, Debug)]
#[command(name = "weft-server")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "weft.toml", env = "WEFT_CONFIG")]
    config: std::path::PathBuf,
}

/// Build the application router.
fn build_router(state: Arc<AppState>) -> Router {
    let api_router = Router::new()
        .route(
            "/components",
            get(list_components).post(publish_component),
        )
        .route("/resolve", post(resolve_bundle))
        .with_state(state.clone());

    #[cfg(feature = "swagger-ui")]
    let api_router = {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        api_router.merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-docs/openapi.json", weft_server::ApiDoc::openapi()),
        )
    };

    Router::new()
        .route("/health", get(health_check))
        .merge(api_router)
        .layer(axum::middleware::from_fn_with_state(state, api_key_auth))
        .layer(build_cors_layer())
        .layer(TraceLayer::new_for_http())
}

/// Build CORS layer from environment configuration.
fn build_cors_layer() -> CorsLayer {
    match std::env::var("WEFT_CORS_ORIGIN") {
        Ok(origins) => {
            use tower_http::cors::AllowOrigin;
            let origin_list: Vec<_> = origins
                .split(',')
                .filter_map(|o| o.trim().parse().ok())
                .collect();
            tracing::info!("CORS: restricted to {} origin(s)", origin_list.len());
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origin_list))
                .allow_methods(tower_http::cors::Any)
                .allow_headers(tower_http::cors::Any)
        }
        Err(_) => {
            tracing::warn!("CORS: permissive (dev mode). Set WEFT_CORS_ORIGIN to restrict origins.");
            CorsLayer::permissive()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = WeftConfig::load_from(&args.config)?;

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Weft server...");

    let (graph, registry): (Arc<dyn GraphStore>, Option<Arc<InMemoryGraphStore>>) =
        match config.graph.backend {
            GraphBackend::Memory => {
                tracing::info!(
                    "Graph store: in-memory (components register via POST /components). \
                     Registered components will NOT persist across restarts."
                );
                let store = Arc::new(InMemoryGraphStore::new());
                (store.clone(), Some(store))
            }
            GraphBackend::Http => {
                let url = config
                    .graph
                    .url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("graph.url is required for the http backend"))?;
                tracing::info!("Graph store: remote at {}", url);
                let mut store = HttpGraphStore::new(url);
                if let Some(ref key) = config.graph.api_key {
                    store = store.with_api_key(key);
                }
                (Arc::new(store), None)
            }
        };

    let resolver = DependencyResolver::new(graph, Arc::new(HttpBlobStore::new()))
        .with_options(config.blob.resolver_options());

    // Read optional API key for authentication
    let api_key = std::env::var("WEFT_API_KEY").ok();
    if api_key.is_some() {
        tracing::info!("Authentication: enabled (WEFT_API_KEY is set)");
    } else {
        tracing::warn!("Authentication: DISABLED (dev mode). Set WEFT_API_KEY to enable.");
    }

    let state = Arc::new(AppState {
        resolver,
        registry,
        api_key,
    });
    let app = build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Weft server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
