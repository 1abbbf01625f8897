//! Document store access.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::config::ConfluenceAuth;
use crate::error::QuizError;
use crate::models::RawDocument;

static PAGE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"pages/(\d+)").expect("valid page id regex"));

/// Resolves a page reference to its raw markup.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, page_ref: &str) -> Result<RawDocument, QuizError>;
}

/// Extract the numeric page id from a reference such as
/// `https://acme.atlassian.net/wiki/spaces/ENG/pages/123456/Title`.
pub fn parse_page_id(page_ref: &str) -> Result<&str, QuizError> {
    PAGE_ID
        .captures(page_ref)
        .and_then(|caps| caps.get(1))
        .map(|id| id.as_str())
        .ok_or_else(|| QuizError::ContentUnavailable(page_ref.to_string()))
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    body: ContentBody,
}

#[derive(Debug, Deserialize)]
struct ContentBody {
    storage: StorageBody,
}

#[derive(Debug, Deserialize)]
struct StorageBody {
    value: String,
}

/// Fetches page storage markup from the Confluence content REST API.
pub struct ConfluenceSource {
    client: Client,
    base_url: Option<String>,
    auth: Option<ConfluenceAuth>,
}

impl ConfluenceSource {
    pub fn new(base_url: Option<String>, auth: Option<ConfluenceAuth>) -> Result<Self, QuizError> {
        let client = Client::builder()
            .user_agent("page-quiz/0.1")
            .build()
            .map_err(|e| QuizError::ContentFetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
            auth,
        })
    }

    /// Base URL of the site, taken from configuration or from the reference itself.
    fn resolve_base_url(&self, page_ref: &str) -> Result<String, QuizError> {
        if let Some(base) = &self.base_url {
            return Ok(base.clone());
        }

        let url = Url::parse(page_ref).map_err(|_| {
            QuizError::ContentFetch(format!(
                "no site base URL configured and '{}' is not a full URL",
                page_ref
            ))
        })?;
        let host = url.host_str().ok_or_else(|| {
            QuizError::ContentFetch(format!("'{}' has no host", page_ref))
        })?;

        Ok(match url.port() {
            Some(port) => format!("{}://{}:{}", url.scheme(), host, port),
            None => format!("{}://{}", url.scheme(), host),
        })
    }

    fn content_url(base_url: &str, page_id: &str) -> String {
        format!(
            "{}/wiki/rest/api/content/{}?expand=body.storage",
            base_url, page_id
        )
    }
}

#[async_trait]
impl DocumentSource for ConfluenceSource {
    async fn fetch(&self, page_ref: &str) -> Result<RawDocument, QuizError> {
        let page_id = parse_page_id(page_ref)?;
        let url = Self::content_url(&self.resolve_base_url(page_ref)?, page_id);

        tracing::debug!(page_id = %page_id, url = %url, "Fetching page content");

        let mut request = self.client.get(&url);
        if let Some(auth) = &self.auth {
            request = request.basic_auth(&auth.email, Some(&auth.api_token));
        }

        let response = request
            .send()
            .await
            .map_err(|e| QuizError::ContentFetch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            tracing::warn!(page_id = %page_id, status = %status, "Content fetch failed");
            return Err(QuizError::ContentFetch(format!(
                "unexpected status {} for page {}",
                status, page_id
            )));
        }

        let content: ContentResponse = response
            .json()
            .await
            .map_err(|e| QuizError::ContentFetch(format!("invalid content response: {}", e)))?;

        tracing::debug!(
            page_id = %page_id,
            markup_len = content.body.storage.value.len(),
            "Fetched page content"
        );

        Ok(RawDocument {
            source_id: page_id.to_string(),
            markup: content.body.storage.value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page_id() {
        assert_eq!(
            parse_page_id("https://acme.atlassian.net/wiki/spaces/ENG/pages/98765/Intro").unwrap(),
            "98765"
        );
        assert_eq!(parse_page_id("pages/42").unwrap(), "42");
    }

    #[test]
    fn test_parse_page_id_rejects_malformed_reference() {
        assert!(matches!(
            parse_page_id("https://acme.atlassian.net/wiki/spaces/ENG/overview"),
            Err(QuizError::ContentUnavailable(_))
        ));
        assert!(matches!(
            parse_page_id("pages/abc"),
            Err(QuizError::ContentUnavailable(_))
        ));
    }

    #[test]
    fn test_base_url_derived_from_reference() {
        let source = ConfluenceSource::new(None, None).unwrap();
        assert_eq!(
            source
                .resolve_base_url("https://acme.atlassian.net/wiki/spaces/ENG/pages/1/T")
                .unwrap(),
            "https://acme.atlassian.net"
        );
        assert_eq!(
            source.resolve_base_url("http://localhost:8090/pages/1").unwrap(),
            "http://localhost:8090"
        );
        assert!(matches!(
            source.resolve_base_url("pages/1"),
            Err(QuizError::ContentFetch(_))
        ));
    }

    #[test]
    fn test_configured_base_url_wins() {
        let source =
            ConfluenceSource::new(Some("https://wiki.example.com/".to_string()), None).unwrap();
        let base = source.resolve_base_url("pages/7").unwrap();
        assert_eq!(
            ConfluenceSource::content_url(&base, "7"),
            "https://wiki.example.com/wiki/rest/api/content/7?expand=body.storage"
        );
    }

    #[test]
    fn test_new_builds_client_and_trims_base_url() {
        let source = ConfluenceSource::new(Some("https://wiki.example.com//".to_string()), None)
            .expect("client should build");
        assert_eq!(source.base_url.as_deref(), Some("https://wiki.example.com"));
        assert!(source.auth.is_none());
    }

    #[tokio::test]
    async fn test_fetch_rejects_reference_without_page_id() {
        let source =
            ConfluenceSource::new(Some("https://wiki.example.com".to_string()), None).unwrap();
        let result = source.fetch("https://wiki.example.com/display/ENG").await;
        assert!(matches!(result, Err(QuizError::ContentUnavailable(_))));
    }

    #[tokio::test]
    #[ignore] // Requires network access and a reachable site
    async fn test_fetch_live_page() {
        let source = ConfluenceSource::new(None, None).unwrap();
        let result = source
            .fetch("https://confluence.atlassian.com/pages/12345")
            .await;
        assert!(result.is_ok());
    }
}
