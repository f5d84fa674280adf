//! Wire protocol — the JSON frames exchanged with WebSocket clients.
//!
//! Inbound, a client sends either a chat request
//! `{"agent": "default", "message": "...", "tools": ["calculator"]}`
//! or an admin command `{"command": "list_agents"}`.
//! Outbound, the server replies with a tagged frame:
//! `{"type": "response", "content": "..."}` on success,
//! `{"type": "error", "content": "..."}` on any failure.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Agent name used when a chat request omits the `agent` field.
pub const DEFAULT_AGENT: &str = "default";

// ─────────────────────────────────────────────
// Client → server
// ─────────────────────────────────────────────

/// A frame received from a client.
///
/// Admin commands are distinguished by their `command` key; everything else
/// is a chat request. Use [`ClientFrame::parse`] — a frame carrying a
/// `command` key is never reinterpreted as a chat, so a typo'd command
/// cannot surface as an "empty message" error.
#[derive(Clone, Debug, PartialEq)]
pub enum ClientFrame {
    Command(AdminCommand),
    Chat(ChatRequest),
}

/// Failures turning raw text into a [`ClientFrame`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    #[error("invalid request: {0}")]
    Invalid(String),
}

impl ClientFrame {
    /// Parse a raw inbound frame.
    pub fn parse(raw: &str) -> Result<Self, FrameParseError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|e| FrameParseError::Invalid(e.to_string()))?;

        if let Some(command) = value.get("command") {
            let name = command.as_str().unwrap_or_default().to_string();
            return match serde_json::from_value::<AdminCommand>(value) {
                Ok(command) => Ok(ClientFrame::Command(command)),
                // A known command with bad arguments is invalid, not unknown.
                Err(e) if matches!(name.as_str(), "list_agents" | "clear_memory") => {
                    Err(FrameParseError::Invalid(e.to_string()))
                }
                Err(_) => Err(FrameParseError::UnknownCommand(name)),
            };
        }

        let chat: ChatRequest =
            serde_json::from_value(value).map_err(|e| FrameParseError::Invalid(e.to_string()))?;
        Ok(ClientFrame::Chat(chat))
    }
}

/// A user message addressed to a named agent.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct ChatRequest {
    /// Target agent name (defaults to `"default"`).
    #[serde(default = "default_agent_name")]
    pub agent: String,
    /// The user's message text.
    #[serde(default)]
    pub message: String,
    /// Extra tool names to make available for this request only.
    #[serde(default)]
    pub tools: Option<Vec<String>>,
}

fn default_agent_name() -> String {
    DEFAULT_AGENT.to_string()
}

/// Administrative commands — synchronous, idempotent, side-effect-free on
/// failure.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum AdminCommand {
    /// List the registered agents.
    ListAgents,
    /// Clear a named agent's conversation memory.
    ClearMemory { agent: String },
}

// ─────────────────────────────────────────────
// Server → client
// ─────────────────────────────────────────────

/// A frame sent to a client.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    /// Successful reply to a chat request.
    Response { content: String },
    /// Any failure: empty message, unknown agent, model/tool fault.
    Error { content: String },
    /// Reply to `list_agents`.
    Agents { agents: Vec<AgentInfo> },
}

impl ServerFrame {
    pub fn response(content: impl Into<String>) -> Self {
        ServerFrame::Response {
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        ServerFrame::Error {
            content: content.into(),
        }
    }
}

/// Summary of a registered agent, as exposed over the admin surface.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentInfo {
    pub name: String,
    pub description: String,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_full() {
        let frame = ClientFrame::parse(
            &json!({
                "agent": "researcher",
                "message": "what is 21+21?",
                "tools": ["calculator"]
            })
            .to_string(),
        )
        .unwrap();

        match frame {
            ClientFrame::Chat(req) => {
                assert_eq!(req.agent, "researcher");
                assert_eq!(req.message, "what is 21+21?");
                assert_eq!(req.tools, Some(vec!["calculator".to_string()]));
            }
            other => panic!("expected chat frame, got {other:?}"),
        }
    }

    #[test]
    fn test_chat_request_defaults_agent() {
        let frame = ClientFrame::parse(r#"{"message": "hello"}"#).unwrap();

        match frame {
            ClientFrame::Chat(req) => {
                assert_eq!(req.agent, DEFAULT_AGENT);
                assert!(req.tools.is_none());
            }
            other => panic!("expected chat frame, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_message_still_parses() {
        // The gateway rejects empty messages; the wire layer accepts them.
        let frame = ClientFrame::parse(r#"{"agent": "default", "message": ""}"#).unwrap();

        match frame {
            ClientFrame::Chat(req) => assert!(req.message.is_empty()),
            other => panic!("expected chat frame, got {other:?}"),
        }
    }

    #[test]
    fn test_list_agents_command() {
        let frame = ClientFrame::parse(r#"{"command": "list_agents"}"#).unwrap();
        assert_eq!(frame, ClientFrame::Command(AdminCommand::ListAgents));
    }

    #[test]
    fn test_clear_memory_command() {
        let frame =
            ClientFrame::parse(r#"{"command": "clear_memory", "agent": "default"}"#).unwrap();
        assert_eq!(
            frame,
            ClientFrame::Command(AdminCommand::ClearMemory {
                agent: "default".into()
            })
        );
    }

    #[test]
    fn test_unrecognized_command_is_not_a_chat() {
        // A frame with a `command` key never falls through to a chat request.
        let err = ClientFrame::parse(r#"{"command": "bogus"}"#).unwrap_err();
        assert_eq!(err, FrameParseError::UnknownCommand("bogus".into()));

        let err = ClientFrame::parse(r#"{"command": 42}"#).unwrap_err();
        assert!(matches!(err, FrameParseError::UnknownCommand(_)));
    }

    #[test]
    fn test_known_command_with_bad_args_is_invalid() {
        // clear_memory without its agent argument is invalid, not unknown.
        let err = ClientFrame::parse(r#"{"command": "clear_memory"}"#).unwrap_err();
        assert!(matches!(err, FrameParseError::Invalid(_)));
    }

    #[test]
    fn test_unparseable_text_is_invalid() {
        let err = ClientFrame::parse("{not json").unwrap_err();
        assert!(matches!(err, FrameParseError::Invalid(_)));
    }

    #[test]
    fn test_response_frame_serialization() {
        let frame = ServerFrame::response("42");
        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "response");
        assert_eq!(json["content"], "42");
    }

    #[test]
    fn test_error_frame_serialization() {
        let frame = ServerFrame::error("Message cannot be empty");
        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "error");
        assert_eq!(json["content"], "Message cannot be empty");
    }

    #[test]
    fn test_agents_frame_serialization() {
        let frame = ServerFrame::Agents {
            agents: vec![AgentInfo {
                name: "default".into(),
                description: "A general-purpose chat agent".into(),
            }],
        };
        let json = serde_json::to_value(&frame).unwrap();

        assert_eq!(json["type"], "agents");
        assert_eq!(json["agents"][0]["name"], "default");
    }
}
