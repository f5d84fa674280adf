//! Core types for Relaybot — conversation messages, step traces, and the
//! model-reply shape shared by every crate in the workspace.
//!
//! Conversations are typed up front: a message is exactly a user input, an
//! assistant answer, or a tool-invocation record. Partial model "thoughts"
//! never land in memory.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Roles and chat messages
// ─────────────────────────────────────────────

/// Who produced a message in a conversation transcript.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// One turn in a conversation transcript.
///
/// Immutable once appended to memory. Tool-invocation records carry the tool
/// name, the input it was called with, and the output it produced (which may
/// be an error description — tool failures are observations, not faults).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<String>,
}

impl ChatMessage {
    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
            tool_name: None,
            tool_input: None,
            tool_output: None,
        }
    }

    /// Create a final assistant answer.
    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
            tool_name: None,
            tool_input: None,
            tool_output: None,
        }
    }

    /// Create a tool-invocation record.
    ///
    /// `content` is the output again, so the transcript replays cleanly to a
    /// model that only understands role + content.
    pub fn tool_record(
        name: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        let output = output.into();
        ChatMessage {
            role: Role::Tool,
            content: output.clone(),
            tool_name: Some(name.into()),
            tool_input: Some(input.into()),
            tool_output: Some(output),
        }
    }
}

// ─────────────────────────────────────────────
// Step traces and run outcomes
// ─────────────────────────────────────────────

/// Transient record of one loop iteration.
///
/// `tool` is `None` when the step did not involve a tool (e.g. the echo
/// engine's single step). `output` is the tool output or, for a terminal
/// step, the model's final answer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct AgentStep {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    pub output: String,
}

impl AgentStep {
    /// Record a tool invocation (successful or not — errors are outputs).
    pub fn tool_call(
        tool: impl Into<String>,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        AgentStep {
            tool: Some(tool.into()),
            input: Some(input.into()),
            output: output.into(),
        }
    }

    /// Record a step with no tool involved.
    pub fn plain(output: impl Into<String>) -> Self {
        AgentStep {
            tool: None,
            input: None,
            output: output.into(),
        }
    }
}

/// The result of a completed (possibly degraded) agent run.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct RunOutcome {
    /// The final textual answer delivered to the caller.
    pub answer: String,
    /// Ordered trace of the iterations taken to get there.
    pub steps: Vec<AgentStep>,
    /// True when the iteration cap was hit before the model produced a
    /// final answer and `answer` is the best available text instead.
    #[serde(default)]
    pub degraded: bool,
}

// ─────────────────────────────────────────────
// Model replies
// ─────────────────────────────────────────────

/// What the model decided on one iteration: stop with an answer, or call a
/// named tool with a text payload.
#[derive(Clone, Debug, PartialEq)]
pub enum ModelReply {
    /// Terminal: the model's final answer.
    Answer(String),
    /// The model wants a tool executed before it can answer.
    ToolCall { tool: String, input: String },
}

/// Name + description pair advertised to the model for each available tool.
///
/// `ToolRegistry::list()` yields these in registration order so the system
/// prompt is reproducible across runs with an identical tool set.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
}

impl ToolDescriptor {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        ToolDescriptor {
            name: name.into(),
            description: description.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Knowledge context
// ─────────────────────────────────────────────

/// One ranked passage returned by the knowledge collaborator.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Passage {
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

/// Ranked passages injected into a model request as opaque context.
///
/// The agent core never interprets this beyond formatting it into the
/// system prompt; retrieval quality is the collaborator's problem.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeContext {
    pub passages: Vec<Passage>,
}

impl KnowledgeContext {
    /// Whether there is anything worth injecting into the prompt.
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_serialization() {
        let msg = ChatMessage::user("Hello!");
        let json = serde_json::to_value(&msg).unwrap();

        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "Hello!");
        // Tool fields should be absent, not null
        assert!(json.get("tool_name").is_none());
        assert!(json.get("tool_output").is_none());
    }

    #[test]
    fn test_tool_record_carries_output_as_content() {
        let msg = ChatMessage::tool_record("calculator", "21+21", "42");

        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.content, "42");
        assert_eq!(msg.tool_name.as_deref(), Some("calculator"));
        assert_eq!(msg.tool_input.as_deref(), Some("21+21"));
        assert_eq!(msg.tool_output.as_deref(), Some("42"));
    }

    #[test]
    fn test_message_round_trip() {
        let messages = vec![
            ChatMessage::user("What is 21+21?"),
            ChatMessage::tool_record("calculator", "21+21", "42"),
            ChatMessage::assistant("42"),
        ];

        let json_str = serde_json::to_string(&messages).unwrap();
        let back: Vec<ChatMessage> = serde_json::from_str(&json_str).unwrap();

        assert_eq!(messages, back);
    }

    #[test]
    fn test_role_deserialization() {
        let msg: ChatMessage =
            serde_json::from_value(json!({"role": "assistant", "content": "hi"})).unwrap();
        assert_eq!(msg.role, Role::Assistant);
    }

    #[test]
    fn test_agent_step_tool_call() {
        let step = AgentStep::tool_call("clock", "", "2026-08-27 10:00:00 UTC");
        assert_eq!(step.tool.as_deref(), Some("clock"));
        assert!(!step.output.is_empty());
    }

    #[test]
    fn test_run_outcome_serialization() {
        let outcome = RunOutcome {
            answer: "42".into(),
            steps: vec![AgentStep::tool_call("calculator", "21+21", "42")],
            degraded: false,
        };
        let json = serde_json::to_value(&outcome).unwrap();

        assert_eq!(json["answer"], "42");
        assert_eq!(json["steps"][0]["tool"], "calculator");
        assert_eq!(json["degraded"], false);
    }

    #[test]
    fn test_knowledge_context_empty() {
        assert!(KnowledgeContext::default().is_empty());

        let ctx = KnowledgeContext {
            passages: vec![Passage {
                content: "Rust is a systems language.".into(),
                source: Some("handbook.md".into()),
                score: Some(0.91),
            }],
        };
        assert!(!ctx.is_empty());
    }
}
