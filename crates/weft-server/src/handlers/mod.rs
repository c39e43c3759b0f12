//! HTTP handlers for the Weft REST API.
//!
//! Organized by domain:
//! - `health`: health check
//! - `components`: publish/list components into the in-memory graph store
//! - `resolve`: dependency-tree resolution into a source bundle

pub mod components;
pub mod health;
pub mod resolve;

pub use components::{list_components, publish_component};
pub use health::health_check;
pub use resolve::resolve_bundle;
