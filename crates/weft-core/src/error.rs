//! Error types for weft-core.

use thiserror::Error;

use crate::identity::ComponentIdentity;

/// Resolution error types.
#[derive(Error, Debug)]
pub enum Error {
    /// Component identity failed validation.
    #[error("Invalid component identity: {0}")]
    InvalidIdentity(String),

    /// Graph store query failed (store unreachable, malformed query, or
    /// unknown root).
    #[error("Graph query failed: {0}")]
    GraphQuery(String),

    /// A specific dependency's source could not be retrieved. This is the
    /// sole error surfaced for a failed resolution, regardless of how many
    /// other fetches succeeded.
    #[error("Error downloading file for {identity}: {reason}")]
    BlobFetch {
        /// Identity of the dependency whose blob fetch failed.
        identity: ComponentIdentity,
        /// Short reason (HTTP status text, "empty response body", timeout).
        reason: String,
    },

    /// A blob endpoint returned a non-success status or an empty body.
    #[error("Blob fetch failed for {uri}: {reason}")]
    BlobUnavailable {
        /// URI that was fetched.
        uri: String,
        /// Status text or failure description.
        reason: String,
    },

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for resolution operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blob_fetch_display_names_the_component() {
        let err = Error::BlobFetch {
            identity: ComponentIdentity::new("alice", "button").unwrap(),
            reason: "404 Not Found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Error downloading file for alice/button: 404 Not Found"
        );
    }

    #[test]
    fn test_graph_query_display() {
        let err = Error::GraphQuery("store unavailable".to_string());
        assert_eq!(err.to_string(), "Graph query failed: store unavailable");
    }
}
