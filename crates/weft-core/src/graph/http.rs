//! Remote graph store connector.
//!
//! Delegates closure computation to an RPC endpoint: a single POST returns
//! the full transitive edge set for a root set, already deduplicated and
//! depth-tagged by the remote store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::GraphStore;
use crate::error::{Error, Result};
use crate::identity::{ComponentIdentity, DependencyEdge};

/// Graph store backed by a remote closure RPC.
pub struct HttpGraphStore {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl HttpGraphStore {
    /// Creates a connector for the store at `base_url`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            client: reqwest::Client::new(),
        }
    }

    /// Attaches an API key sent as `x-api-key` (builder pattern).
    #[must_use]
    pub fn with_api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let mut req = self.client.post(&url);
        if let Some(ref key) = self.api_key {
            req = req.header("x-api-key", key);
        }
        req.header("Content-Type", "application/json")
    }
}

#[derive(Debug, Serialize)]
struct ClosureRequest<'a> {
    components: Vec<ComponentRef<'a>>,
    with_demo_dependencies: bool,
}

#[derive(Debug, Serialize)]
struct ComponentRef<'a> {
    username: &'a str,
    slug: &'a str,
}

#[derive(Debug, Deserialize)]
struct ClosureRow {
    component_slug: String,
    registry: String,
    code: String,
    #[serde(default)]
    dependencies: HashMap<String, String>,
    dependency_author_username: String,
    depth: u32,
    #[serde(default)]
    is_demo_dependency: bool,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: String,
}

impl ClosureRow {
    fn into_edge(self) -> Result<DependencyEdge> {
        let target = ComponentIdentity::new(&self.dependency_author_username, &self.component_slug)
            .map_err(|e| Error::GraphQuery(format!("invalid identity in closure row: {e}")))?;
        Ok(
            DependencyEdge::new(target, &self.registry, &self.code, self.depth)
                .with_npm_dependencies(self.dependencies)
                .with_demo_only(self.is_demo_dependency),
        )
    }
}

#[async_trait]
impl GraphStore for HttpGraphStore {
    async fn dependency_closure(
        &self,
        roots: &[ComponentIdentity],
        with_demo_dependencies: bool,
    ) -> Result<Vec<DependencyEdge>> {
        let request_body = ClosureRequest {
            components: roots
                .iter()
                .map(|r| ComponentRef {
                    username: r.author(),
                    slug: r.slug(),
                })
                .collect(),
            with_demo_dependencies,
        };

        debug!(roots = roots.len(), "querying remote dependency closure");

        let resp = self
            .request("/rpc/dependency_closure")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| Error::GraphQuery(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map_or(body, |envelope| envelope.message);
            return Err(Error::GraphQuery(format!(
                "closure query failed: {status} - {message}"
            )));
        }

        let rows: Vec<ClosureRow> = resp
            .json()
            .await
            .map_err(|e| Error::GraphQuery(format!("malformed closure response: {e}")))?;

        debug!(rows = rows.len(), "closure query complete");

        rows.into_iter().map(ClosureRow::into_edge).collect()
    }
}
