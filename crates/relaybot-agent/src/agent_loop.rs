//! Agent loop — the bounded reason/act/observe cycle.
//!
//! One `run()` takes a user message, optional retrieved knowledge, and
//! optional per-request extra tools, then interleaves model calls with tool
//! invocations until the model produces a final answer or the iteration cap
//! is hit. Tool faults are observations the model gets to react to; a model
//! fault aborts the run with the partial step trace attached.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info, warn};

use relaybot_core::types::{
    AgentStep, ChatMessage, KnowledgeContext, ModelReply, RunOutcome, ToolDescriptor,
};
use relaybot_providers::{ModelClient, ModelClientError};

use crate::memory::ConversationMemory;
use crate::tools::knowledge::format_context;
use crate::tools::registry::invoke_tool;
use crate::tools::{Tool, ToolRegistry};

/// Default maximum model ↔ tool iterations per user message.
pub const DEFAULT_MAX_ITERATIONS: usize = 3;

/// Default per-tool-invocation timeout.
pub const DEFAULT_TOOL_TIMEOUT: Duration = Duration::from_secs(30);

/// Answer used when the iteration cap is hit and no tool produced any text.
const EXHAUSTED_FALLBACK: &str =
    "I wasn't able to produce a final answer within the allotted reasoning steps.";

// ─────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────

/// A run aborted by a model-client fault.
///
/// Tool faults never produce this — they are folded into the step trace.
/// The steps taken before the fault are preserved for observability, and
/// memory keeps every message committed before the fault (the unanswered
/// user turn included, so a retry picks up from that state).
#[derive(Debug, Error)]
#[error("{cause}")]
pub struct RunFailure {
    #[source]
    pub cause: ModelClientError,
    pub steps: Vec<AgentStep>,
}

// ─────────────────────────────────────────────
// AgentLoop
// ─────────────────────────────────────────────

/// The tool-augmented reasoning loop bound to one agent's memory.
pub struct AgentLoop {
    /// Agent identity, used in the system prompt and logs.
    agent_name: String,
    /// Model inference collaborator.
    model: Arc<dyn ModelClient>,
    /// Tools permanently bound to this agent.
    tools: ToolRegistry,
    /// The agent's ordered transcript.
    memory: ConversationMemory,
    /// Max model ↔ tool iterations per run.
    max_iterations: usize,
    /// Per-tool-invocation timeout.
    tool_timeout: Duration,
}

impl AgentLoop {
    /// Create a loop with default limits.
    pub fn new(agent_name: impl Into<String>, model: Arc<dyn ModelClient>, tools: ToolRegistry) -> Self {
        Self {
            agent_name: agent_name.into(),
            model,
            tools,
            memory: ConversationMemory::new(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            tool_timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    /// Override the iteration cap (builder pattern).
    pub fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = max.max(1);
        self
    }

    /// Override the per-tool timeout (builder pattern).
    pub fn with_tool_timeout(mut self, timeout: Duration) -> Self {
        self.tool_timeout = timeout;
        self
    }

    /// The agent's transcript (read-only).
    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    /// Reset the transcript to empty. Safe to call between runs; the
    /// registry serializes it against in-flight runs.
    pub fn clear(&mut self) {
        self.memory.clear();
        debug!(agent = %self.agent_name, "memory cleared");
    }

    /// Run the loop for one user message.
    pub async fn run(
        &mut self,
        input: &str,
        knowledge: Option<&KnowledgeContext>,
        extra_tools: &[Arc<dyn Tool>],
    ) -> Result<RunOutcome, RunFailure> {
        self.memory.push(ChatMessage::user(input));

        let catalogue = self.build_catalogue(extra_tools);
        let system = self.build_system_prompt(&catalogue, knowledge);
        let mut steps: Vec<AgentStep> = Vec::new();

        for iteration in 0..self.max_iterations {
            debug!(agent = %self.agent_name, iteration, "model call");

            let reply = match self
                .model
                .complete(&system, self.memory.transcript(), &catalogue)
                .await
            {
                Ok(reply) => reply,
                Err(cause) => {
                    warn!(
                        agent = %self.agent_name,
                        iteration,
                        error = %cause,
                        "model client failed, aborting run"
                    );
                    return Err(RunFailure { cause, steps });
                }
            };

            match reply {
                ModelReply::Answer(answer) => {
                    self.memory.push(ChatMessage::assistant(&answer));
                    info!(
                        agent = %self.agent_name,
                        iterations = iteration + 1,
                        steps = steps.len(),
                        "run finished"
                    );
                    return Ok(RunOutcome {
                        answer,
                        steps,
                        degraded: false,
                    });
                }
                ModelReply::ToolCall { tool, input } => {
                    let output = match self.resolve_tool(&tool, extra_tools) {
                        Some(resolved) => {
                            info!(agent = %self.agent_name, tool = %tool, iteration, "tool call");
                            invoke_tool(&resolved, &input, self.tool_timeout).await
                        }
                        None => {
                            warn!(agent = %self.agent_name, tool = %tool, "tool not found");
                            format!("Error: tool '{tool}' not found")
                        }
                    };

                    self.memory
                        .push(ChatMessage::tool_record(&tool, &input, &output));
                    steps.push(AgentStep::tool_call(tool, input, output));
                }
            }
        }

        // Iteration cap hit without a final answer: degraded success, not a
        // failure. Best available text is the most recent tool output.
        let answer = steps
            .last()
            .map(|s| s.output.clone())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| EXHAUSTED_FALLBACK.to_string());

        self.memory.push(ChatMessage::assistant(&answer));
        warn!(
            agent = %self.agent_name,
            max_iterations = self.max_iterations,
            "iteration cap reached, returning degraded answer"
        );

        Ok(RunOutcome {
            answer,
            steps,
            degraded: true,
        })
    }

    /// Resolve a tool by name: the agent's own registry first, then the
    /// per-request extras. Case-sensitive exact match.
    fn resolve_tool(&self, name: &str, extra_tools: &[Arc<dyn Tool>]) -> Option<Arc<dyn Tool>> {
        self.tools
            .resolve(name)
            .or_else(|| extra_tools.iter().find(|t| t.name() == name).cloned())
    }

    /// The full tool catalogue advertised to the model: bound tools in
    /// registration order, then the per-request extras.
    fn build_catalogue(&self, extra_tools: &[Arc<dyn Tool>]) -> Vec<ToolDescriptor> {
        let mut catalogue = self.tools.list();
        for tool in extra_tools {
            if !catalogue.iter().any(|d| d.name == tool.name()) {
                catalogue.push(tool.descriptor());
            }
        }
        catalogue
    }

    /// Static system instructions: identity, tool catalogue, and the
    /// optional knowledge context for this run.
    fn build_system_prompt(
        &self,
        catalogue: &[ToolDescriptor],
        knowledge: Option<&KnowledgeContext>,
    ) -> String {
        let mut parts = vec![format!(
            "You are {}, a helpful assistant. Answer the user's question \
             directly when you can. When a tool would help, call it and use \
             its output.",
            self.agent_name
        )];

        if !catalogue.is_empty() {
            let listing: Vec<String> = catalogue
                .iter()
                .map(|d| format!("- {}: {}", d.name, d.description))
                .collect();
            parts.push(format!("Available tools:\n{}", listing.join("\n")));
        }

        if let Some(ctx) = knowledge.filter(|c| !c.is_empty()) {
            parts.push(format!(
                "Context from the knowledge base:\n{}",
                format_context(ctx)
            ));
        }

        parts.join("\n\n")
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
