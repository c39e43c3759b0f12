//! In-memory graph store.
//!
//! Holds published components and their direct dependency links, and answers
//! closure queries with a breadth-first walk. Cycle-safe via a visited set
//! keyed on [`ComponentIdentity`]; a re-reached component keeps its first
//! (shallowest) row.

use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;

use super::GraphStore;
use crate::error::{Error, Result};
use crate::identity::{ComponentIdentity, DependencyEdge};

/// A direct dependency link from one component to another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyLink {
    target: ComponentIdentity,
    demo_only: bool,
}

impl DependencyLink {
    /// Creates a link to `target`.
    #[must_use]
    pub fn new(target: ComponentIdentity) -> Self {
        Self {
            target,
            demo_only: false,
        }
    }

    /// Marks this link as demo-only (builder pattern).
    #[must_use]
    pub fn demo_only(mut self) -> Self {
        self.demo_only = true;
        self
    }

    /// Returns the link target.
    #[must_use]
    pub fn target(&self) -> &ComponentIdentity {
        &self.target
    }

    /// Returns true if the link is only needed for a demo.
    #[must_use]
    pub fn is_demo_only(&self) -> bool {
        self.demo_only
    }
}

/// Everything a publisher registers for one component.
#[derive(Debug, Clone)]
pub struct ComponentRecord {
    /// Identity of the published component.
    pub identity: ComponentIdentity,
    /// Registry the component belongs to (e.g. `ui`, `hooks`).
    pub registry: String,
    /// Opaque URI of the component's source blob.
    pub blob_uri: String,
    /// npm manifest fragment required by the component.
    pub npm_dependencies: HashMap<String, String>,
    /// Direct dependency links.
    pub links: Vec<DependencyLink>,
}

/// In-memory store of published components with closure computed in-process.
///
/// Shared behind an `Arc`; interior mutability lets the server register
/// components while resolutions run.
#[derive(Debug, Default)]
pub struct InMemoryGraphStore {
    components: RwLock<HashMap<ComponentIdentity, ComponentRecord>>,
}

impl InMemoryGraphStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a component, replacing any previous record for the same
    /// identity.
    pub fn publish(&self, record: ComponentRecord) {
        self.components
            .write()
            .insert(record.identity.clone(), record);
    }

    /// Returns true if a component is registered.
    #[must_use]
    pub fn contains(&self, identity: &ComponentIdentity) -> bool {
        self.components.read().contains_key(identity)
    }

    /// Returns the number of registered components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.read().len()
    }

    /// Returns true if no components are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.read().is_empty()
    }

    /// Returns all registered identities.
    #[must_use]
    pub fn identities(&self) -> Vec<ComponentIdentity> {
        self.components.read().keys().cloned().collect()
    }

    fn closure_row(record: &ComponentRecord, depth: u32, demo_only: bool) -> DependencyEdge {
        DependencyEdge::new(
            record.identity.clone(),
            &record.registry,
            &record.blob_uri,
            depth,
        )
        .with_npm_dependencies(record.npm_dependencies.clone())
        .with_demo_only(demo_only)
    }
}

#[async_trait]
impl GraphStore for InMemoryGraphStore {
    async fn dependency_closure(
        &self,
        roots: &[ComponentIdentity],
        with_demo_dependencies: bool,
    ) -> Result<Vec<DependencyEdge>> {
        let components = self.components.read();

        let mut rows = Vec::new();
        let mut visited: HashSet<ComponentIdentity> = HashSet::new();
        let mut queue: VecDeque<(ComponentIdentity, u32, bool)> = VecDeque::new();

        for root in roots {
            if !components.contains_key(root) {
                return Err(Error::GraphQuery(format!("unknown component {root}")));
            }
            if visited.insert(root.clone()) {
                queue.push_back((root.clone(), 0, false));
            }
        }

        while let Some((identity, depth, demo_only)) = queue.pop_front() {
            let Some(record) = components.get(&identity) else {
                // Dangling link: a published component references a target
                // that was never registered.
                warn!(component = %identity, "skipping unregistered dependency");
                continue;
            };

            rows.push(Self::closure_row(record, depth, demo_only));

            for link in &record.links {
                if link.is_demo_only() && !with_demo_dependencies {
                    continue;
                }
                if visited.insert(link.target().clone()) {
                    queue.push_back((link.target().clone(), depth + 1, link.is_demo_only()));
                }
            }
        }

        Ok(rows)
    }
}
