//! HTTP request tool — outbound calls to external APIs.
//!
//! Input is a JSON object describing the request:
//! `{"url": "...", "method": "GET", "headers": {...}, "params": {...},
//!   "body": {...}}`.
//! JSON responses come back pretty-printed; anything else comes back as
//! text, truncated to a sane size for the model.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use relaybot_core::utils::truncate_string;

use super::base::Tool;

/// Max chars of response body returned to the model.
const MAX_RESPONSE_CHARS: usize = 20_000;

#[derive(Debug, Deserialize)]
struct RequestSpec {
    url: String,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    params: HashMap<String, String>,
    #[serde(default)]
    body: Option<Value>,
}

/// Sends an HTTP request described by a JSON payload.
pub struct HttpRequestTool {
    client: reqwest::Client,
}

impl HttpRequestTool {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

impl Default for HttpRequestTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for HttpRequestTool {
    fn name(&self) -> &str {
        "http_request"
    }

    fn description(&self) -> &str {
        "Send an HTTP request to an external API. Input is a JSON object with \
         'url' (required), 'method' (default GET), and optional 'headers', \
         'params', and 'body' fields."
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let spec: RequestSpec = serde_json::from_str(input)
            .map_err(|e| anyhow::anyhow!("input must be a JSON request object: {e}"))?;

        let method = spec.method.as_deref().unwrap_or("GET").to_uppercase();
        let method = match method.as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "DELETE" => Method::DELETE,
            "PATCH" => Method::PATCH,
            "HEAD" => Method::HEAD,
            other => anyhow::bail!("unsupported HTTP method '{other}'"),
        };

        debug!(url = %spec.url, method = %method, "http_request tool call");

        let mut request = self.client.request(method, &spec.url);
        for (key, value) in &spec.headers {
            request = request.header(key, value);
        }
        if !spec.params.is_empty() {
            request = request.query(&spec.params);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| anyhow::anyhow!("request failed: {e}"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| anyhow::anyhow!("failed to read response body: {e}"))?;

        // Pretty-print JSON bodies; pass anything else through as-is.
        let body = match serde_json::from_str::<Value>(&text) {
            Ok(v) => serde_json::to_string_pretty(&v).unwrap_or(text),
            Err(_) => text,
        };

        Ok(format!(
            "HTTP {}\n{}",
            status.as_u16(),
            truncate_string(&body, MAX_RESPONSE_CHARS)
        ))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
