//! Access to the API server
//!
//! Everything kubestale needs from the cluster is a JSON document at a path,
//! so the seam is a single `get_json` call. `HttpClusterApi` talks plain HTTP
//! to a base URL, typically `kubectl proxy` which takes care of credentials.

use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde_json::Value;
use url::Url;

use crate::error::{KubeError, Result};

/// Longest response body excerpt kept in error messages
const BODY_PREVIEW_CHARS: usize = 180;

/// Read-only access to API server paths
#[async_trait]
pub trait ClusterApi: Send + Sync {
    /// GET `path` (starting with `/`) and parse the body as JSON
    async fn get_json(&self, path: &str) -> Result<Value>;
}

/// `ClusterApi` over HTTP(S)
pub struct HttpClusterApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpClusterApi {
    /// Create a client for the API server at `base_url`
    pub fn new(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url).map_err(|e| KubeError::InvalidUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(KubeError::InvalidUrl {
                url: base_url.to_string(),
                reason: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("kubestale/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| KubeError::Client(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL without trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl ClusterApi for HttpClusterApi {
    async fn get_json(&self, path: &str) -> Result<Value> {
        let url = self.url_for(path);
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| KubeError::network(&url, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| KubeError::network(&url, e))?;

        if !status.is_success() {
            return Err(KubeError::HttpStatus {
                url,
                status: status.as_u16(),
                body: body.chars().take(BODY_PREVIEW_CHARS).collect(),
            });
        }

        serde_json::from_str(&body)
            .map_err(|e| KubeError::unexpected(path, format!("invalid JSON: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_json_sends_json_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"versions": ["v1"]})))
            .expect(1)
            .mount(&server)
            .await;

        let api = HttpClusterApi::new(&server.uri()).unwrap();
        let value = api.get_json("/api").await.unwrap();
        assert_eq!(value, json!({"versions": ["v1"]}));
    }

    #[tokio::test]
    async fn test_trailing_slash_in_base_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/apis"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"groups": []})))
            .mount(&server)
            .await;

        let api = HttpClusterApi::new(&format!("{}/", server.uri())).unwrap();
        assert_eq!(api.base_url(), server.uri());
        assert!(api.get_json("/apis").await.is_ok());
    }

    #[tokio::test]
    async fn test_error_status_is_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/secrets"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let api = HttpClusterApi::new(&server.uri()).unwrap();
        let err = api.get_json("/api/v1/secrets").await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(err.to_string().contains("forbidden"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_unexpected_response() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy</html>"))
            .mount(&server)
            .await;

        let api = HttpClusterApi::new(&server.uri()).unwrap();
        let err = api.get_json("/api").await.unwrap_err();
        assert!(matches!(err, KubeError::UnexpectedResponse { .. }));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let api = HttpClusterApi::new("http://127.0.0.1:1").unwrap();
        let err = api.get_json("/api").await.unwrap_err();
        assert!(matches!(err, KubeError::Network { .. }));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpClusterApi::new("localhost:8001 nope"),
            Err(KubeError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpClusterApi::new("ftp://localhost:8001"),
            Err(KubeError::InvalidUrl { .. })
        ));
    }
}
