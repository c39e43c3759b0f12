//! Merged resolution bundles.
//!
//! A [`ResolvedBundle`] is the all-or-nothing success value of a resolution:
//! a path-keyed source file map plus a merged npm manifest fragment, ready to
//! be serialized into a bundling payload for an in-browser sandbox.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::identity::DependencyEdge;

/// Fallback extension when a blob URI carries none.
const DEFAULT_EXTENSION: &str = "tsx";

/// One resolved source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedFile {
    /// Raw source text fetched from the blob store.
    pub code: String,
    /// Registry the component is published under (e.g. `ui`, `hooks`).
    pub registry: String,
}

/// The merged output of a successful resolution.
///
/// File entries and npm maps are merged by plain key overwrite: later
/// entries in iteration order win silently on collision. Callers should
/// treat the last-write-wins npm merge as an accepted limitation, not a
/// guarantee of correctness under version conflicts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBundle {
    /// Source files keyed by deterministic bundle path.
    pub files: BTreeMap<String, ResolvedFile>,
    /// Merged npm dependency map across every resolved component.
    pub npm_dependencies: HashMap<String, String>,
}

impl ResolvedBundle {
    /// Creates an empty bundle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fetched component into the bundle.
    ///
    /// The file lands at [`bundle_path`] for the edge; npm entries overwrite
    /// existing keys, logging when an already-present key changes version.
    pub fn insert(&mut self, edge: &DependencyEdge, code: String) {
        let path = bundle_path(edge);
        if self.files.contains_key(&path) {
            debug!(%path, "overwriting previously merged file entry");
        }
        self.files.insert(
            path,
            ResolvedFile {
                code,
                registry: edge.registry().to_string(),
            },
        );

        for (name, version) in edge.npm_dependencies() {
            if let Some(existing) = self.npm_dependencies.get(name) {
                if existing != version {
                    warn!(
                        package = %name,
                        kept = %version,
                        dropped = %existing,
                        "npm version conflict, last write wins"
                    );
                }
            }
            self.npm_dependencies
                .insert(name.clone(), version.clone());
        }
    }

    /// Returns the number of resolved files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the bundle holds no files.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Derives the deterministic bundle path for a closure row:
/// `/components/{registry}/{slug}.{ext}`, with the extension taken from the
/// blob URI and falling back to `tsx`.
#[must_use]
pub fn bundle_path(edge: &DependencyEdge) -> String {
    format!(
        "/components/{}/{}.{}",
        edge.registry(),
        edge.target().slug(),
        uri_extension(edge.blob_uri()).unwrap_or(DEFAULT_EXTENSION)
    )
}

/// Extracts a plausible file extension from the final path segment of a URI.
fn uri_extension(uri: &str) -> Option<&str> {
    let last_segment = uri.rsplit('/').next().unwrap_or(uri);
    // Ignore query strings on pre-signed URLs.
    let last_segment = last_segment.split('?').next().unwrap_or(last_segment);
    let (_, ext) = last_segment.rsplit_once('.')?;
    if !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        Some(ext)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::ComponentIdentity;

    fn edge(author: &str, slug: &str, registry: &str, uri: &str) -> DependencyEdge {
        DependencyEdge::new(
            ComponentIdentity::new(author, slug).unwrap(),
            registry,
            uri,
            0,
        )
    }

    #[test]
    fn test_bundle_path_uses_uri_extension() {
        let e = edge("alice", "use-toast", "hooks", "https://cdn.x/use-toast.ts");
        assert_eq!(bundle_path(&e), "/components/hooks/use-toast.ts");
    }

    #[test]
    fn test_bundle_path_falls_back_to_tsx() {
        let e = edge("alice", "button", "ui", "https://cdn.x/blobs/4f2a9c");
        assert_eq!(bundle_path(&e), "/components/ui/button.tsx");
    }

    #[test]
    fn test_bundle_path_ignores_query_string() {
        let e = edge("alice", "button", "ui", "https://cdn.x/button.tsx?sig=abc.def");
        assert_eq!(bundle_path(&e), "/components/ui/button.tsx");
    }

    #[test]
    fn test_insert_merges_npm_last_write_wins() {
        let mut bundle = ResolvedBundle::new();

        let first = edge("alice", "button", "ui", "https://x/button.tsx")
            .with_npm_dependencies(HashMap::from([("react".to_string(), "18.2.0".to_string())]));
        let second = edge("bob", "card", "ui", "https://x/card.tsx")
            .with_npm_dependencies(HashMap::from([("react".to_string(), "18.3.1".to_string())]));

        bundle.insert(&first, "b".to_string());
        bundle.insert(&second, "c".to_string());

        assert_eq!(bundle.len(), 2);
        assert_eq!(bundle.npm_dependencies.get("react").unwrap(), "18.3.1");
    }

    #[test]
    fn test_insert_overwrites_colliding_path() {
        let mut bundle = ResolvedBundle::new();

        // Two authors, same slug and registry: same deterministic path.
        bundle.insert(&edge("alice", "button", "ui", "https://x/a.tsx"), "a".to_string());
        bundle.insert(&edge("bob", "button", "ui", "https://x/b.tsx"), "b".to_string());

        assert_eq!(bundle.len(), 1);
        assert_eq!(bundle.files["/components/ui/button.tsx"].code, "b");
    }
}
