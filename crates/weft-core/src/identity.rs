//! Component identities and dependency-closure rows.
//!
//! These types mirror what a graph store returns for a closure query: the
//! resolver never walks edges itself, it only filters and fetches the rows
//! handed back by the store.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Uniquely names a publishable component: `(author, slug)`.
///
/// Immutable once created. Displays as `author/slug`.
///
/// # Example
///
/// ```rust
/// use weft_core::ComponentIdentity;
///
/// let id = ComponentIdentity::new("alice", "button").unwrap();
/// assert_eq!(id.author(), "alice");
/// assert_eq!(id.slug(), "button");
/// assert_eq!(id.to_string(), "alice/button");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComponentIdentity {
    author: String,
    slug: String,
}

impl ComponentIdentity {
    /// Creates a new identity from an author username and a component slug.
    ///
    /// Both parts are trimmed; slashes are rejected since the pair is
    /// rendered as a single `author/slug` path segment.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidIdentity` if either part is empty,
    /// whitespace-only, or contains `/`.
    pub fn new(author: &str, slug: &str) -> Result<Self> {
        let author = author.trim();
        let slug = slug.trim();
        if author.is_empty() || slug.is_empty() {
            return Err(Error::InvalidIdentity(
                "author and slug must be non-empty".to_string(),
            ));
        }
        if author.contains('/') || slug.contains('/') {
            return Err(Error::InvalidIdentity(format!(
                "author and slug must not contain '/': {author}/{slug}"
            )));
        }
        Ok(Self {
            author: author.to_string(),
            slug: slug.to_string(),
        })
    }

    /// Returns the author username.
    #[must_use]
    pub fn author(&self) -> &str {
        &self.author
    }

    /// Returns the component slug.
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }
}

impl std::fmt::Display for ComponentIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.author, self.slug)
    }
}

/// One row of the transitively-closed edge set returned by a graph store.
///
/// Depth 0 rows are the direct requirement from a root (including the root's
/// own code row); depth > 0 rows are transitive. `demo_only` marks rows that
/// are needed only to render a component's demo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DependencyEdge {
    target: ComponentIdentity,
    registry: String,
    blob_uri: String,
    npm_dependencies: HashMap<String, String>,
    depth: u32,
    demo_only: bool,
}

impl DependencyEdge {
    /// Creates a closure row for `target` at the given traversal depth.
    #[must_use]
    pub fn new(target: ComponentIdentity, registry: &str, blob_uri: &str, depth: u32) -> Self {
        Self {
            target,
            registry: registry.to_string(),
            blob_uri: blob_uri.to_string(),
            npm_dependencies: HashMap::new(),
            depth,
            demo_only: false,
        }
    }

    /// Attaches the target's npm manifest fragment (builder pattern).
    #[must_use]
    pub fn with_npm_dependencies(mut self, deps: HashMap<String, String>) -> Self {
        self.npm_dependencies = deps;
        self
    }

    /// Marks this row as demo-only (builder pattern).
    #[must_use]
    pub fn with_demo_only(mut self, demo_only: bool) -> Self {
        self.demo_only = demo_only;
        self
    }

    /// Returns the target identity.
    #[must_use]
    pub fn target(&self) -> &ComponentIdentity {
        &self.target
    }

    /// Returns the registry the target is published under (e.g. `ui`).
    #[must_use]
    pub fn registry(&self) -> &str {
        &self.registry
    }

    /// Returns the opaque URI of the target's source blob.
    #[must_use]
    pub fn blob_uri(&self) -> &str {
        &self.blob_uri
    }

    /// Returns the target's npm manifest fragment.
    #[must_use]
    pub fn npm_dependencies(&self) -> &HashMap<String, String> {
        &self.npm_dependencies
    }

    /// Returns the traversal depth of this row.
    #[must_use]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Returns true if this row is needed only for a demo.
    #[must_use]
    pub fn demo_only(&self) -> bool {
        self.demo_only
    }

    /// Inclusion predicate for a resolution.
    ///
    /// A row survives iff demo dependencies were requested, or it is not
    /// demo-only, or it sits at depth 0 (the direct requirement is always
    /// included even when flagged demo-only upstream).
    #[must_use]
    pub fn included(&self, include_demo_dependencies: bool) -> bool {
        include_demo_dependencies || !self.demo_only || self.depth == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rejects_empty_parts() {
        assert!(ComponentIdentity::new("", "button").is_err());
        assert!(ComponentIdentity::new("alice", "  ").is_err());
    }

    #[test]
    fn test_identity_rejects_slash() {
        assert!(ComponentIdentity::new("alice/bob", "button").is_err());
        assert!(ComponentIdentity::new("alice", "ui/button").is_err());
    }

    #[test]
    fn test_identity_trims_whitespace() {
        let id = ComponentIdentity::new(" alice ", "button\n").unwrap();
        assert_eq!(id.to_string(), "alice/button");
    }

    #[test]
    fn test_included_predicate() {
        let id = ComponentIdentity::new("alice", "button").unwrap();
        let direct = DependencyEdge::new(id.clone(), "ui", "https://x/button.tsx", 0)
            .with_demo_only(true);
        let transitive = DependencyEdge::new(id, "ui", "https://x/icon.tsx", 2)
            .with_demo_only(true);

        // Depth 0 is always included, demo flag or not.
        assert!(direct.included(false));
        assert!(direct.included(true));

        // Deeper demo-only rows are included only on request.
        assert!(!transitive.included(false));
        assert!(transitive.included(true));
    }
}
