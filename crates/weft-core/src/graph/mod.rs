//! Graph store collaborators.
//!
//! A graph store owns the dependency graph and answers closure queries; the
//! resolver delegates all traversal correctness (cycle handling, depth
//! computation, dedup) to it. Two implementations are provided:
//!
//! - [`InMemoryGraphStore`]: components registered in-process, closure
//!   computed with a breadth-first walk
//! - [`HttpGraphStore`]: closure delegated to a remote RPC endpoint

pub mod http;
pub mod memory;

pub use http::HttpGraphStore;
pub use memory::{ComponentRecord, DependencyLink, InMemoryGraphStore};

use async_trait::async_trait;

use crate::error::Result;
use crate::identity::{ComponentIdentity, DependencyEdge};

/// Read-only query interface over a dependency graph.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Returns the full transitive edge set reachable from `roots`.
    ///
    /// Each root contributes its own code row at depth 0; dependencies
    /// appear at depth ≥ 1. When `with_demo_dependencies` is false the store
    /// may prune demo-only subtrees, but the resolver still applies its own
    /// inclusion predicate over whatever is returned.
    ///
    /// # Errors
    ///
    /// Returns `Error::GraphQuery` if the store is unreachable, the query is
    /// malformed, or a root is unknown.
    async fn dependency_closure(
        &self,
        roots: &[ComponentIdentity],
        with_demo_dependencies: bool,
    ) -> Result<Vec<DependencyEdge>>;
}
