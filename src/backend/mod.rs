//! HTTP transport to the search backend.
//!
//! The backend exposes plain GET endpoints with a single `q` parameter.
//! [`Backend`] wraps one pooled `reqwest` client and maps transport,
//! status and decoding failures to [`SeekError::Network`].

pub mod protocol;

pub use protocol::*;

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::settings::{ClientConfig, Indexer};
use crate::{Result, SeekError};

/// Connection to the search backend.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone, Debug)]
pub struct Backend {
    http: reqwest::Client,
    endpoint: String,
}

impl Backend {
    /// Create a backend connection.
    ///
    /// # Arguments
    /// * `endpoint` - Base URL, e.g. `http://localhost:8080`
    /// * `timeout` - Per-request timeout
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SeekError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::new(&config.endpoint, config.timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `GET <endpoint><path>[?q=<q>]` and require a 2xx status.
    async fn get(&self, path: &str, q: Option<&str>) -> Result<reqwest::Response> {
        let url = format!("{}{}", self.endpoint, path);
        let mut request = self.http.get(&url);
        if let Some(q) = q {
            request = request.query(&[(QUERY_KEY, q)]);
        }

        let response = request.send().await.map_err(|e| {
            SeekError::Network(format!(
                "Failed to reach backend at {}: {}. Is the server running?",
                self.endpoint, e
            ))
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SeekError::Network(format!(
                "{} returned {}: {}",
                path,
                status,
                body.trim()
            )));
        }

        Ok(response)
    }

    /// GET a JSON document.
    ///
    /// # Errors
    /// Returns `Network` if the request fails or the body isn't valid JSON
    /// for `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, q: Option<&str>) -> Result<T> {
        let body = self.get(path, q).await?.bytes().await?;
        serde_json::from_slice(&body)
            .map_err(|e| SeekError::Network(format!("Malformed response from {}: {}", path, e)))
    }

    /// GET a binary body.
    pub async fn get_bytes(&self, path: &str, q: Option<&str>) -> Result<Vec<u8>> {
        let body = self.get(path, q).await?.bytes().await?;
        Ok(body.to_vec())
    }

    /// Fetch the indexers registered with the backend.
    pub async fn indexers(&self) -> Result<Vec<Indexer>> {
        let indexers: Vec<Indexer> = self.get_json(ALL_INDEXERS_PATH, None).await?;
        tracing::debug!("Backend reports {} indexers", indexers.len());
        Ok(indexers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> Backend {
        Backend::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let backend = Backend::new("http://localhost:8080/", Duration::from_secs(1)).unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:8080");
    }

    #[tokio::test]
    async fn test_indexers() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/all/indexers"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([{
                "ID": "1",
                "Name": "TestIndexer",
                "ExecPath": "/some/indexer/path",
                "Args": ["arg1"],
                "Port": 1
            }])))
            .expect(1)
            .mount(&server)
            .await;

        let indexers = backend_for(&server).indexers().await.unwrap();
        assert_eq!(
            indexers,
            vec![Indexer {
                name: "TestIndexer".to_string(),
                id: 1,
                port: 1,
            }]
        );
    }

    #[tokio::test]
    async fn test_non_success_status_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/download"))
            .and(query_param("q", "missing.txt"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = backend_for(&server)
            .get_bytes(DOWNLOAD_PATH, Some("missing.txt"))
            .await
            .unwrap_err();
        match err {
            SeekError::Network(msg) => assert!(msg.contains("500")),
            other => panic!("expected network error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_is_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(200).set_body_string("No keys given: <nil>"))
            .mount(&server)
            .await;

        let result: Result<SearchResponse> =
            backend_for(&server).get_json(SEARCH_PATH, Some("x")).await;
        assert!(matches!(result, Err(SeekError::Network(_))));
    }

    #[tokio::test]
    async fn test_unreachable_backend() {
        // Port 9 (discard) is not expected to have an HTTP server
        let backend = Backend::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = backend.get_bytes(DOWNLOAD_PATH, Some("a")).await;
        assert!(matches!(result, Err(SeekError::Network(_))));
    }
}
