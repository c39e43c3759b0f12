//! Dependency resolution.
//!
//! [`DependencyResolver`] converts a set of root component identities into a
//! complete, deduplicated source-file bundle: one closure query against the
//! graph store, then a concurrent blob fetch per surviving row, then a merge.
//! The contract is all-or-nothing — a single failed fetch fails the whole
//! resolution, and no partial bundle is ever returned.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt, TryStreamExt};
use tracing::debug;

use crate::blob::BlobStore;
use crate::bundle::ResolvedBundle;
use crate::error::{Error, Result};
use crate::graph::GraphStore;
use crate::identity::{ComponentIdentity, DependencyEdge};

/// Fetch-phase knobs.
///
/// Defaults reproduce the historical contract: unbounded fan-out and no
/// per-fetch timeout, so a single hanging fetch stalls the resolution.
/// Deployments that need backpressure opt in through these fields.
#[derive(Debug, Clone, Default)]
pub struct ResolverOptions {
    /// Upper bound on concurrently in-flight blob fetches. `None` fetches
    /// every surviving row at once.
    pub max_concurrent_fetches: Option<usize>,
    /// Per-fetch deadline. `None` waits indefinitely.
    pub fetch_timeout: Option<Duration>,
}

/// Resolves root identities into a merged source bundle.
///
/// Holds no state across calls; each [`resolve`](Self::resolve) invocation
/// is independent and safe to run concurrently with others.
pub struct DependencyResolver {
    graph: Arc<dyn GraphStore>,
    blobs: Arc<dyn BlobStore>,
    options: ResolverOptions,
}

impl DependencyResolver {
    /// Creates a resolver over the given collaborators with default options.
    #[must_use]
    pub fn new(graph: Arc<dyn GraphStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self {
            graph,
            blobs,
            options: ResolverOptions::default(),
        }
    }

    /// Overrides the fetch-phase options (builder pattern).
    #[must_use]
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves `roots` into a merged bundle.
    ///
    /// Phase order is strict: the closure query completes before any fetch
    /// begins. Rows are filtered by the inclusion predicate (demo-only rows
    /// at depth > 0 are dropped unless `include_demo_dependencies` is set),
    /// then every surviving row's blob is fetched concurrently. The first
    /// fetch error — in settle order, not submission order — cancels the
    /// remaining fetches and becomes the sole returned error.
    ///
    /// # Errors
    ///
    /// - `Error::GraphQuery` if `roots` is empty or the store query fails.
    /// - `Error::BlobFetch` naming the first dependency whose blob could not
    ///   be retrieved.
    pub async fn resolve(
        &self,
        roots: &[ComponentIdentity],
        include_demo_dependencies: bool,
    ) -> Result<ResolvedBundle> {
        if roots.is_empty() {
            return Err(Error::GraphQuery("root set is empty".to_string()));
        }

        let closure = self
            .graph
            .dependency_closure(roots, include_demo_dependencies)
            .await?;

        let wanted: Vec<DependencyEdge> = closure
            .into_iter()
            .filter(|edge| edge.included(include_demo_dependencies))
            .collect();

        debug!(
            roots = roots.len(),
            edges = wanted.len(),
            "closure query complete, fetching blobs"
        );

        let concurrency = self
            .options
            .max_concurrent_fetches
            .unwrap_or_else(|| wanted.len().max(1));

        let fetched: Vec<(DependencyEdge, String)> =
            stream::iter(wanted.into_iter().map(|edge| self.fetch_one(edge)))
                .buffer_unordered(concurrency)
                .try_collect()
                .await?;

        let mut bundle = ResolvedBundle::new();
        for (edge, code) in fetched {
            bundle.insert(&edge, code);
        }

        debug!(files = bundle.len(), "resolution complete");
        Ok(bundle)
    }

    /// Fetches one row's blob, wrapping any failure with the row's identity.
    async fn fetch_one(&self, edge: DependencyEdge) -> Result<(DependencyEdge, String)> {
        let fetch = self.blobs.fetch_text(edge.blob_uri());
        let outcome = match self.options.fetch_timeout {
            Some(limit) => match tokio::time::timeout(limit, fetch).await {
                Ok(result) => result,
                Err(_) => Err(Error::BlobUnavailable {
                    uri: edge.blob_uri().to_string(),
                    reason: format!("timed out after {}ms", limit.as_millis()),
                }),
            },
            None => fetch.await,
        };

        match outcome {
            Ok(code) => Ok((edge, code)),
            Err(err) => {
                let reason = match err {
                    Error::BlobUnavailable { reason, .. } => reason,
                    other => other.to_string(),
                };
                Err(Error::BlobFetch {
                    identity: edge.target().clone(),
                    reason,
                })
            }
        }
    }
}
