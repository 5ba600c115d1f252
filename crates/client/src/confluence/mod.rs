//! Confluence document source.
//!
//! Resolves a page URL to its id and fetches the storage-format body through
//! the REST API:
//!
//! - **Endpoint**: `{wiki_url}/rest/api/content/{id}?expand=body.storage`
//! - **Authentication**: HTTP basic with username and API token.
//! - **Failures**: unknown pages, auth errors, timeouts and empty bodies all
//!   surface as `CONTENT_FETCH_FAILED`.

pub mod response;

use std::time::{Duration, Instant};

use pagepulse_core::Error;
use pagepulse_core::config::ConfluenceConfig;
use pagepulse_core::rating::{Document, DocumentSource};
use reqwest::{Client, StatusCode, header};

use crate::locator::page_id;
use response::ContentResponse;

/// Default user agent.
const DEFAULT_USER_AGENT: &str = concat!("pagepulse/", env!("CARGO_PKG_VERSION"));

/// Confluence client configuration.
#[derive(Debug, Clone)]
pub struct ConfluenceClientConfig {
    /// Wiki base URL, without trailing slash.
    pub base_url: String,
    pub username: String,
    pub api_token: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
}

impl From<&ConfluenceConfig> for ConfluenceClientConfig {
    fn from(config: &ConfluenceConfig) -> Self {
        Self {
            base_url: config.wiki_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            api_token: config.api_token.clone().unwrap_or_default(),
            timeout: config.timeout(),
        }
    }
}

/// Confluence REST client.
#[derive(Debug, Clone)]
pub struct ConfluenceClient {
    http: Client,
    config: ConfluenceClientConfig,
}

impl ConfluenceClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ConfluenceClientConfig) -> Result<Self, Error> {
        if config.base_url.is_empty() {
            return Err(Error::InvalidInput("confluence wiki_url is not configured".into()));
        }

        let http = Client::builder()
            .user_agent(DEFAULT_USER_AGENT)
            .timeout(config.timeout)
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::ContentFetch(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Fetch the storage-format body of page `id`.
    pub async fn fetch_page(&self, id: &str) -> Result<String, Error> {
        let start = Instant::now();
        let url = format!("{}/rest/api/content/{}", self.config.base_url, id);

        let response = self
            .http
            .get(&url)
            .query(&[("expand", "body.storage")])
            .basic_auth(&self.config.username, Some(&self.config.api_token))
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::ContentFetch(format!("timeout fetching page {id}"))
                } else {
                    Error::ContentFetch(format!("network error fetching page {id}: {e}"))
                }
            })?;

        let status = response.status();
        tracing::debug!("confluence response status for page {}: {}", id, status);

        match status {
            StatusCode::NOT_FOUND => return Err(Error::ContentFetch(format!("page {id} not found"))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(Error::ContentFetch(format!("not authorized to read page {id}")));
            }
            s if !s.is_success() => return Err(Error::ContentFetch(format!("status {} for page {id}", s.as_u16()))),
            _ => {}
        }

        let content: ContentResponse = response
            .json()
            .await
            .map_err(|e| Error::ContentFetch(format!("unreadable response for page {id}: {e}")))?;

        let body = content
            .into_storage_value()
            .filter(|b| !b.trim().is_empty())
            .ok_or_else(|| Error::ContentFetch(format!("page {id} has no body")))?;

        tracing::debug!("fetched page {} in {}ms ({} bytes)", id, start.elapsed().as_millis(), body.len());

        Ok(body)
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &ConfluenceClientConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl DocumentSource for ConfluenceClient {
    async fn fetch_document(&self, locator: &str) -> Result<Document, Error> {
        let id = page_id(locator).map_err(|e| Error::ContentFetch(e.to_string()))?;
        let body = self.fetch_page(&id).await?;
        Ok(Document { id, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ConfluenceClient {
        ConfluenceClient::new(ConfluenceClientConfig {
            base_url: server.uri(),
            username: "bot@example.com".into(),
            api_token: "token".into(),
            timeout: Duration::from_secs(2),
        })
        .unwrap()
    }

    #[test]
    fn test_config_from_core() {
        let core = ConfluenceConfig { wiki_url: "https://wiki.example.com/".into(), ..Default::default() };
        let config = ConfluenceClientConfig::from(&core);
        assert_eq!(config.base_url, "https://wiki.example.com");
        assert_eq!(config.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_client_new_missing_base_url() {
        let config = ConfluenceClientConfig::from(&ConfluenceConfig::default());
        assert!(matches!(ConfluenceClient::new(config), Err(Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_fetch_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/content/123"))
            .and(query_param("expand", "body.storage"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "123",
                "title": "Home",
                "body": {"storage": {"value": "<p>Hello</p>", "representation": "storage"}}
            })))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let doc = client
            .fetch_document("https://wiki.example.com/spaces/ENG/pages/123/Home")
            .await
            .unwrap();
        assert_eq!(doc.id, "123");
        assert_eq!(doc.body, "<p>Hello</p>");
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/content/404"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_page("404").await;
        assert!(matches!(result, Err(Error::ContentFetch(msg)) if msg.contains("not found")));
    }

    #[tokio::test]
    async fn test_fetch_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/api/content/5"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "5"})))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_page("5").await;
        assert!(matches!(result, Err(Error::ContentFetch(msg)) if msg.contains("no body")));
    }

    #[tokio::test]
    async fn test_fetch_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = ConfluenceClient::new(ConfluenceClientConfig {
            base_url: server.uri(),
            username: "u".into(),
            api_token: "t".into(),
            timeout: Duration::from_millis(200),
        })
        .unwrap();

        let result = client.fetch_page("1").await;
        assert!(matches!(result, Err(Error::ContentFetch(msg)) if msg.contains("timeout")));
    }

    #[tokio::test]
    async fn test_unparseable_locator() {
        let server = MockServer::start().await;
        let result = client_for(&server).fetch_document("https://wiki.example.com/").await;
        assert!(matches!(result, Err(Error::ContentFetch(_))));
    }
}
