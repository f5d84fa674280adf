//! HTTP knowledge client — talks to the external semantic-search service.
//!
//! Calls `GET {base}/knowledge/search?query=…&limit=…` and maps the ranked
//! results into a [`KnowledgeContext`]. Every failure here is recoverable by
//! design: callers degrade to "no knowledge context available" and keep
//! going.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use relaybot_core::types::{KnowledgeContext, Passage};

use crate::traits::{KnowledgeClient, KnowledgeError};

// ─────────────────────────────────────────────
// Service response shape
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    document: SearchDocument,
    #[serde(default)]
    similarity: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchDocument {
    content: String,
    #[serde(default)]
    metadata: DocumentMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentMetadata {
    #[serde(default)]
    source: Option<String>,
}

// ─────────────────────────────────────────────
// HttpKnowledgeClient
// ─────────────────────────────────────────────

/// Knowledge client backed by the HTTP search service.
#[derive(Debug)]
pub struct HttpKnowledgeClient {
    client: reqwest::Client,
    base_url: String,
    limit: u32,
    timeout_secs: u64,
}

impl HttpKnowledgeClient {
    /// Create a new client.
    pub fn new(
        base_url: impl Into<String>,
        limit: u32,
        timeout_secs: u64,
    ) -> Result<Self, KnowledgeError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| KnowledgeError::Unavailable(e.to_string()))?;

        Ok(HttpKnowledgeClient {
            client,
            base_url: base_url.into(),
            limit,
            timeout_secs,
        })
    }

    fn search_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        format!("{}/knowledge/search", base)
    }
}

#[async_trait]
impl KnowledgeClient for HttpKnowledgeClient {
    async fn search(&self, query: &str) -> Result<KnowledgeContext, KnowledgeError> {
        debug!(query = %query, limit = self.limit, "knowledge lookup");

        let response = self
            .client
            .get(self.search_url())
            .query(&[("query", query), ("limit", &self.limit.to_string())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    KnowledgeError::Timeout(self.timeout_secs)
                } else {
                    KnowledgeError::Unavailable(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(KnowledgeError::Unavailable(format!(
                "search returned {status}"
            )));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| KnowledgeError::Malformed(e.to_string()))?;

        let passages = parsed
            .results
            .into_iter()
            .map(|r| Passage {
                content: r.document.content,
                source: r.document.metadata.source,
                score: r.similarity,
            })
            .collect();

        Ok(KnowledgeContext { passages })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_maps_passages() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/knowledge/search"))
            .and(query_param("query", "rust"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "results": [
                    {
                        "document": {
                            "content": "Rust is a systems language.",
                            "metadata": {"source": "handbook.md"}
                        },
                        "similarity": 0.91
                    },
                    {
                        "document": {"content": "Cargo is the build tool."},
                        "similarity": 0.74
                    }
                ]
            })))
            .mount(&server)
            .await;

        let client = HttpKnowledgeClient::new(server.uri(), 5, 5).unwrap();
        let ctx = client.search("rust").await.unwrap();

        assert_eq!(ctx.passages.len(), 2);
        assert_eq!(ctx.passages[0].content, "Rust is a systems language.");
        assert_eq!(ctx.passages[0].source.as_deref(), Some("handbook.md"));
        assert_eq!(ctx.passages[0].score, Some(0.91));
        assert!(ctx.passages[1].source.is_none());
    }

    #[tokio::test]
    async fn test_empty_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/knowledge/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "results": []
            })))
            .mount(&server)
            .await;

        let client = HttpKnowledgeClient::new(server.uri(), 5, 5).unwrap();
        let ctx = client.search("anything").await.unwrap();
        assert!(ctx.is_empty());
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/knowledge/search"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = HttpKnowledgeClient::new(server.uri(), 5, 5).unwrap();
        let err = client.search("rust").await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_unavailable() {
        // Nothing listens on this port.
        let client = HttpKnowledgeClient::new("http://127.0.0.1:1", 5, 1).unwrap();
        let err = client.search("rust").await.unwrap_err();
        assert!(matches!(
            err,
            KnowledgeError::Unavailable(_) | KnowledgeError::Timeout(_)
        ));
    }
}
