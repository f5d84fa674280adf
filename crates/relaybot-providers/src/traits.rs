//! Collaborator interfaces — the model and knowledge boundaries the agent
//! loop calls across.
//!
//! Both are explicit result-or-failure contracts: a model fault aborts the
//! current run, a knowledge fault degrades to "no context". Neither relies
//! on unwinding.

use async_trait::async_trait;
use thiserror::Error;

use relaybot_core::types::{ChatMessage, KnowledgeContext, ModelReply, ToolDescriptor};

// ─────────────────────────────────────────────
// Model client
// ─────────────────────────────────────────────

/// Configuration passed to each model call.
#[derive(Clone, Debug)]
pub struct ModelRequestConfig {
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
}

impl Default for ModelRequestConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4096,
            temperature: 0.7,
        }
    }
}

/// Failures from the model collaborator.
///
/// All of these are fatal to the current run — no further reasoning is
/// possible without the model.
#[derive(Debug, Error)]
pub enum ModelClientError {
    #[error("model transport error: {0}")]
    Transport(String),

    #[error("model call timed out after {0}s")]
    Timeout(u64),

    #[error("model API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("malformed model response: {0}")]
    Malformed(String),
}

/// Interface to a language-model inference collaborator.
///
/// One call per loop iteration: the full transcript goes in, a final answer
/// or a tool-call intent comes out.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Request one completion.
    ///
    /// # Arguments
    /// * `system`     — Static system instructions (identity, tool catalogue,
    ///   optional knowledge passages).
    /// * `transcript` — Full conversation memory, in turn order, ending with
    ///   the newest user message.
    /// * `tools`      — Tools the model may select by name.
    async fn complete(
        &self,
        system: &str,
        transcript: &[ChatMessage],
        tools: &[ToolDescriptor],
    ) -> Result<ModelReply, ModelClientError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}

// ─────────────────────────────────────────────
// Knowledge client
// ─────────────────────────────────────────────

/// Failures from the knowledge collaborator. Never fatal to a loop.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("knowledge service unreachable: {0}")]
    Unavailable(String),

    #[error("knowledge lookup timed out after {0}s")]
    Timeout(u64),

    #[error("malformed knowledge response: {0}")]
    Malformed(String),
}

/// Interface to an external semantic-search collaborator.
///
/// The agent core treats the result as opaque ranked passages; the retrieval
/// mechanism behind this boundary is not part of the core design.
#[async_trait]
pub trait KnowledgeClient: Send + Sync {
    /// Retrieve passages relevant to `query`.
    async fn search(&self, query: &str) -> Result<KnowledgeContext, KnowledgeError>;
}
