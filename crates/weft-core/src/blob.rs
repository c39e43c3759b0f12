//! Blob store collaborators.
//!
//! Content-addressed source storage, consumed through a single GET-by-URI
//! fetch. Authentication is assumed pre-baked into the URI (pre-signed) or
//! handled by an outer layer; no credentials are part of this contract.

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

/// GET-by-URI fetch over opaque blob URIs.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetches the raw text stored at `uri`.
    ///
    /// # Errors
    ///
    /// Returns `Error::BlobUnavailable` on a non-success status or an empty
    /// body, `Error::Http` on transport failure. Not retried.
    async fn fetch_text(&self, uri: &str) -> Result<String>;
}

/// Blob store over plain HTTP(S) GETs.
#[derive(Debug, Clone, Default)]
pub struct HttpBlobStore {
    client: reqwest::Client,
}

impl HttpBlobStore {
    /// Creates a blob store with a fresh HTTP client.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a blob store reusing an existing HTTP client.
    #[must_use]
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn fetch_text(&self, uri: &str) -> Result<String> {
        debug!(%uri, "fetching blob");

        let resp = self.client.get(uri).send().await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let reason = status
                .canonical_reason()
                .map_or_else(|| status.to_string(), |r| format!("{} {r}", status.as_u16()));
            return Err(Error::BlobUnavailable {
                uri: uri.to_string(),
                reason,
            });
        }

        let text = resp.text().await?;
        if text.is_empty() {
            return Err(Error::BlobUnavailable {
                uri: uri.to_string(),
                reason: "empty response body".to_string(),
            });
        }

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_returns_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/button.tsx"))
            .respond_with(ResponseTemplate::new(200).set_body_string("export const Button = 1;"))
            .mount(&server)
            .await;

        let store = HttpBlobStore::new();
        let text = store
            .fetch_text(&format!("{}/button.tsx", server.uri()))
            .await
            .unwrap();
        assert_eq!(text, "export const Button = 1;");
    }

    #[tokio::test]
    async fn test_not_found_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let store = HttpBlobStore::new();
        let err = store
            .fetch_text(&format!("{}/missing.tsx", server.uri()))
            .await
            .unwrap_err();

        match err {
            Error::BlobUnavailable { reason, .. } => assert!(reason.contains("404")),
            other => panic!("expected BlobUnavailable, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_empty_body_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let store = HttpBlobStore::new();
        let err = store
            .fetch_text(&format!("{}/empty.tsx", server.uri()))
            .await
            .unwrap_err();

        match err {
            Error::BlobUnavailable { reason, .. } => assert_eq!(reason, "empty response body"),
            other => panic!("expected BlobUnavailable, got {other}"),
        }
    }
}
