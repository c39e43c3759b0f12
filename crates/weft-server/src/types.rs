//! Request/response types for the Weft REST API.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use weft_core::ResolvedBundle;

/// Reference to a published component.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct ComponentRef {
    /// Author username.
    pub author: String,
    /// Component slug.
    pub slug: String,
}

/// Body of `POST /components`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PublishComponentRequest {
    /// Author username.
    pub author: String,
    /// Component slug.
    pub slug: String,
    /// Registry the component belongs to (e.g. `ui`, `hooks`).
    pub registry: String,
    /// URI of the component's source blob.
    pub code_uri: String,
    /// npm manifest fragment required by the component.
    #[serde(default)]
    pub npm_dependencies: HashMap<String, String>,
    /// Direct dependency links.
    #[serde(default)]
    pub dependencies: Vec<PublishDependency>,
}

/// One direct dependency declared at publish time.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PublishDependency {
    /// Author username of the dependency.
    pub author: String,
    /// Slug of the dependency.
    pub slug: String,
    /// True if the dependency is only needed to render the demo.
    #[serde(default)]
    pub demo_only: bool,
}

/// Body of `POST /resolve`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ResolveRequest {
    /// Root components to resolve.
    pub components: Vec<ComponentRef>,
    /// Include demo-only dependencies beyond depth 0.
    #[serde(default)]
    pub with_demo_dependencies: bool,
}

/// One resolved file in the response payload.
#[derive(Debug, Serialize, ToSchema)]
pub struct FileWithRegistry {
    /// Raw source text.
    pub code: String,
    /// Registry the component is published under.
    pub registry: String,
}

/// Successful resolution payload.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolveData {
    /// Source files keyed by bundle path.
    pub files_with_registry: BTreeMap<String, FileWithRegistry>,
    /// Merged npm dependency map.
    pub npm_dependencies: HashMap<String, String>,
}

impl From<ResolvedBundle> for ResolveData {
    fn from(bundle: ResolvedBundle) -> Self {
        Self {
            files_with_registry: bundle
                .files
                .into_iter()
                .map(|(path, file)| {
                    (
                        path,
                        FileWithRegistry {
                            code: file.code,
                            registry: file.registry,
                        },
                    )
                })
                .collect(),
            npm_dependencies: bundle.npm_dependencies,
        }
    }
}

/// Envelope returned by `POST /resolve`: exactly one of `data`/`error` is
/// non-null.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolveResponse {
    /// Resolution payload on success.
    pub data: Option<ResolveData>,
    /// Error message on failure.
    pub error: Option<String>,
}

impl ResolveResponse {
    /// Builds a success envelope.
    #[must_use]
    pub fn ok(data: ResolveData) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    /// Builds a failure envelope.
    #[must_use]
    pub fn err(message: String) -> Self {
        Self {
            data: None,
            error: Some(message),
        }
    }
}

/// Generic error body for non-resolve endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_response_serializes_null_fields() {
        let json = serde_json::to_string(&ResolveResponse::err("boom".to_string())).unwrap();
        assert!(json.contains("\"data\":null"));
        assert!(json.contains("\"error\":\"boom\""));
    }

    #[test]
    fn test_resolve_data_uses_camel_case_keys() {
        let data = ResolveData {
            files_with_registry: BTreeMap::new(),
            npm_dependencies: HashMap::new(),
        };
        let json = serde_json::to_string(&ResolveResponse::ok(data)).unwrap();
        assert!(json.contains("\"filesWithRegistry\""));
        assert!(json.contains("\"npmDependencies\""));
        assert!(json.contains("\"error\":null"));
    }
}
