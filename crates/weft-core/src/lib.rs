//! # Weft Core
//!
//! Dependency-resolution engine for the Weft component registry.
//!
//! Weft resolves a set of root component identities into a complete,
//! deduplicated source-file bundle suitable for client-side compilation and
//! preview. Transitive closure computation is delegated to a pluggable
//! graph store; source text is fetched from content-addressed blob storage.
//!
//! ## Design
//!
//! - **All-or-nothing**: a single failed blob fetch fails the whole
//!   resolution; no partial bundle is ever returned.
//! - **Post-hoc filtering**: the resolver never walks the graph itself; it
//!   filters the closed edge set returned by the store.
//! - **Last-write-wins merge**: npm manifest fragments merge by plain key
//!   overwrite. Conflicts are logged, not rejected.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use weft_core::graph::{ComponentRecord, InMemoryGraphStore};
//! use weft_core::{ComponentIdentity, DependencyResolver, HttpBlobStore};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Register a component
//!     let graph = Arc::new(InMemoryGraphStore::new());
//!     graph.publish(ComponentRecord {
//!         identity: ComponentIdentity::new("alice", "button")?,
//!         registry: "ui".to_string(),
//!         blob_uri: "https://cdn.example.com/alice/button.tsx".to_string(),
//!         npm_dependencies: HashMap::new(),
//!         links: vec![],
//!     });
//!
//!     // Resolve it into a source bundle
//!     let resolver = DependencyResolver::new(graph, Arc::new(HttpBlobStore::new()));
//!     let roots = vec![ComponentIdentity::new("alice", "button")?];
//!     let bundle = resolver.resolve(&roots, false).await?;
//!
//!     for (path, file) in &bundle.files {
//!         println!("{path} ({} bytes)", file.code.len());
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
// Clippy lints configured in workspace Cargo.toml [workspace.lints.clippy]

pub mod blob;
pub mod bundle;
pub mod config;
pub mod error;
pub mod graph;
pub mod identity;
pub mod resolver;

pub use blob::{BlobStore, HttpBlobStore};
pub use bundle::{bundle_path, ResolvedBundle, ResolvedFile};
pub use config::{
    BlobConfig, ConfigError, GraphBackend, GraphConfig, LoggingConfig, ServerConfig, WeftConfig,
};
pub use error::{Error, Result};
pub use graph::{
    ComponentRecord, DependencyLink, GraphStore, HttpGraphStore, InMemoryGraphStore,
};
pub use identity::{ComponentIdentity, DependencyEdge};
pub use resolver::{DependencyResolver, ResolverOptions};
