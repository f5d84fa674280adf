//! Generic HTTP model client for OpenAI-compatible APIs.
//!
//! Talks to any `/chat/completions` endpoint via `reqwest` and maps the
//! response into a [`ModelReply`]: plain content becomes a final answer, a
//! tool call becomes a `ToolCall` intent. Transport faults, timeouts,
//! non-2xx statuses, and unparseable bodies all surface as
//! [`ModelClientError`] — the caller decides that this aborts the run.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use relaybot_core::types::{ChatMessage, ModelReply, Role, ToolDescriptor};

use crate::traits::{ModelClient, ModelClientError, ModelRequestConfig};

// ─────────────────────────────────────────────
// API wire types
// ─────────────────────────────────────────────

/// A message in the chat-completions request body.
#[derive(Debug, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
enum ApiMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ApiToolCall>>,
    },
    Tool {
        content: String,
        tool_call_id: String,
    },
}

#[derive(Debug, Serialize)]
struct ApiToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: ApiFunctionCall,
}

#[derive(Debug, Serialize)]
struct ApiFunctionCall {
    name: String,
    arguments: String,
}

/// Request body for an OpenAI-compatible chat completion API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ApiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<String>,
    max_tokens: u32,
    temperature: f64,
}

/// Response body (the parts we read).
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<ResponseToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ResponseToolCall {
    function: ResponseFunctionCall,
}

#[derive(Debug, Deserialize)]
struct ResponseFunctionCall {
    name: String,
    arguments: String,
}

// ─────────────────────────────────────────────
// HttpModelClient
// ─────────────────────────────────────────────

/// A model client that talks to any OpenAI-compatible HTTP API.
pub struct HttpModelClient {
    /// HTTP client (shared, connection-pooled, request timeout baked in).
    client: reqwest::Client,
    /// API base URL (e.g. `"https://api.openai.com/v1"`).
    api_base: String,
    /// API key for Bearer authentication.
    api_key: String,
    /// Model identifier sent with every request.
    model: String,
    /// Per-call timeout in seconds (for error reporting).
    timeout_secs: u64,
    /// Request parameters (max_tokens, temperature).
    request_config: ModelRequestConfig,
}

impl std::fmt::Debug for HttpModelClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpModelClient")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .finish()
    }
}

impl HttpModelClient {
    /// Create a new client.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
        request_config: ModelRequestConfig,
    ) -> Result<Self, ModelClientError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| ModelClientError::Transport(e.to_string()))?;

        Ok(HttpModelClient {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout_secs,
            request_config,
        })
    }

    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Expand the transcript into API messages.
    ///
    /// Tool records become the assistant-tool-call / tool-result pair the
    /// API expects, with synthesized call ids.
    fn build_messages(system: &str, transcript: &[ChatMessage]) -> Vec<ApiMessage> {
        let mut messages = vec![ApiMessage::System {
            content: system.to_string(),
        }];

        for (i, msg) in transcript.iter().enumerate() {
            match msg.role {
                Role::User => messages.push(ApiMessage::User {
                    content: msg.content.clone(),
                }),
                Role::Assistant => messages.push(ApiMessage::Assistant {
                    content: Some(msg.content.clone()),
                    tool_calls: None,
                }),
                Role::Tool => {
                    let call_id = format!("call_{i}");
                    let name = msg.tool_name.clone().unwrap_or_default();
                    let input = msg.tool_input.clone().unwrap_or_default();
                    messages.push(ApiMessage::Assistant {
                        content: None,
                        tool_calls: Some(vec![ApiToolCall {
                            id: call_id.clone(),
                            call_type: "function".to_string(),
                            function: ApiFunctionCall {
                                name,
                                arguments: json!({ "input": input }).to_string(),
                            },
                        }]),
                    });
                    messages.push(ApiMessage::Tool {
                        content: msg.tool_output.clone().unwrap_or_default(),
                        tool_call_id: call_id,
                    });
                }
            }
        }

        messages
    }

    /// Build the function-calling definitions for the advertised tools.
    ///
    /// Every tool takes a single free-text `input` parameter.
    fn build_tool_defs(tools: &[ToolDescriptor]) -> Option<Vec<Value>> {
        if tools.is_empty() {
            return None;
        }
        Some(
            tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": {
                                "type": "object",
                                "properties": {
                                    "input": {
                                        "type": "string",
                                        "description": "Free-text input for the tool"
                                    }
                                },
                                "required": ["input"]
                            }
                        }
                    })
                })
                .collect(),
        )
    }

    /// Extract the tool input from a function-call arguments string.
    ///
    /// Accepts `{"input": "..."}` or, from sloppier models, the raw string.
    fn parse_tool_input(arguments: &str) -> String {
        match serde_json::from_str::<Value>(arguments) {
            Ok(Value::Object(map)) => map
                .get("input")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
                .unwrap_or_else(|| arguments.to_string()),
            Ok(Value::String(s)) => s,
            _ => arguments.to_string(),
        }
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn complete(
        &self,
        system: &str,
        transcript: &[ChatMessage],
        tools: &[ToolDescriptor],
    ) -> Result<ModelReply, ModelClientError> {
        let request_body = ChatCompletionRequest {
            model: self.model.clone(),
            messages: Self::build_messages(system, transcript),
            tools: Self::build_tool_defs(tools),
            tool_choice: if tools.is_empty() {
                None
            } else {
                Some("auto".to_string())
            },
            max_tokens: self.request_config.max_tokens,
            temperature: self.request_config.temperature,
        };

        debug!(
            model = %self.model,
            transcript = transcript.len(),
            tools = tools.len(),
            "calling model"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "model request failed");
                if e.is_timeout() {
                    ModelClientError::Timeout(self.timeout_secs)
                } else {
                    ModelClientError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "model API error");
            return Err(ModelClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ModelClientError::Malformed(e.to_string()))?;

        let message = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| ModelClientError::Malformed("no choices in response".into()))?;

        if let Some(mut calls) = message.tool_calls.filter(|c| !c.is_empty()) {
            let call = calls.remove(0);
            return Ok(ModelReply::ToolCall {
                tool: call.function.name,
                input: Self::parse_tool_input(&call.function.arguments),
            });
        }

        match message.content {
            Some(content) => Ok(ModelReply::Answer(content)),
            None => Err(ModelClientError::Malformed(
                "response had neither content nor tool calls".into(),
            )),
        }
    }

    fn display_name(&self) -> &str {
        "openai-compatible"
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
