//! Engine trait — the capability surface the registry dispatches through.
//!
//! Anything that can turn a user message into a `RunOutcome` is an engine;
//! the registry neither knows nor cares whether a model sits behind it.

use std::sync::Arc;

use async_trait::async_trait;

use relaybot_core::types::{AgentStep, KnowledgeContext, RunOutcome};

use crate::agent_loop::{AgentLoop, RunFailure};
use crate::tools::Tool;

/// A message processor with its own conversation memory.
#[async_trait]
pub trait AgentEngine: Send + Sync {
    /// Process one user message and produce an outcome.
    async fn process(
        &mut self,
        input: &str,
        knowledge: Option<&KnowledgeContext>,
        extra_tools: &[Arc<dyn Tool>],
    ) -> Result<RunOutcome, RunFailure>;

    /// Forget the conversation so far.
    fn clear_memory(&mut self);

    /// Number of messages currently held in memory.
    fn memory_len(&self) -> usize;
}

#[async_trait]
impl AgentEngine for AgentLoop {
    async fn process(
        &mut self,
        input: &str,
        knowledge: Option<&KnowledgeContext>,
        extra_tools: &[Arc<dyn Tool>],
    ) -> Result<RunOutcome, RunFailure> {
        self.run(input, knowledge, extra_tools).await
    }

    fn clear_memory(&mut self) {
        self.clear();
    }

    fn memory_len(&self) -> usize {
        self.memory().len()
    }
}

// ─────────────────────────────────────────────
// Echo engine
// ─────────────────────────────────────────────

/// Trivial engine that repeats the input back. No model, no tools; useful
/// for wiring checks and as the smallest possible engine implementation.
#[derive(Default)]
pub struct EchoEngine {
    turns: usize,
}

impl EchoEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AgentEngine for EchoEngine {
    async fn process(
        &mut self,
        input: &str,
        _knowledge: Option<&KnowledgeContext>,
        _extra_tools: &[Arc<dyn Tool>],
    ) -> Result<RunOutcome, RunFailure> {
        self.turns += 1;
        let answer = format!("Echo: {input}");
        Ok(RunOutcome {
            answer: answer.clone(),
            steps: vec![AgentStep::plain(answer)],
            degraded: false,
        })
    }

    fn clear_memory(&mut self) {
        self.turns = 0;
    }

    fn memory_len(&self) -> usize {
        self.turns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_echo_engine() {
        let mut engine = EchoEngine::new();
        let outcome = engine.process("hello", None, &[]).await.unwrap();

        assert_eq!(outcome.answer, "Echo: hello");
        assert_eq!(outcome.steps.len(), 1);
        assert!(!outcome.degraded);
        assert_eq!(engine.memory_len(), 1);

        engine.clear_memory();
        assert_eq!(engine.memory_len(), 0);
    }
}
