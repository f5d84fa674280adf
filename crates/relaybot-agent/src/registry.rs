//! Agent Registry — named agents and per-agent serialized dispatch.
//!
//! The table itself is guarded by a `std::sync::RwLock` (lookups are cheap
//! and never held across an await); each agent's engine sits behind its own
//! `tokio::sync::Mutex`, so runs against the same agent are serialized in
//! arrival order while runs against different agents proceed concurrently.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;
use tracing::{debug, info};

use relaybot_core::types::{KnowledgeContext, RunOutcome};
use relaybot_core::wire::AgentInfo;

use crate::agent_loop::RunFailure;
use crate::engine::AgentEngine;
use crate::tools::Tool;

/// Registration and lookup failures.
#[derive(Debug, Error)]
pub enum AgentRegistryError {
    #[error("agent '{0}' is already registered")]
    DuplicateAgent(String),
    #[error("agent '{0}' not found")]
    AgentNotFound(String),
}

/// Dispatch failures: the agent may not exist, or its run may have aborted.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("agent '{0}' not found")]
    AgentNotFound(String),
    #[error("agent run failed: {0}")]
    Run(#[from] RunFailure),
}

// ─────────────────────────────────────────────
// Agent
// ─────────────────────────────────────────────

/// A named, registered agent. The engine mutex is the serialization point:
/// `tokio::sync::Mutex` grants the lock in FIFO order, so messages to one
/// agent are processed in the order they arrive.
pub struct Agent {
    pub name: String,
    pub description: String,
    engine: tokio::sync::Mutex<Box<dyn AgentEngine>>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        engine: Box<dyn AgentEngine>,
    ) -> Self {
        Agent {
            name: name.into(),
            description: description.into(),
            engine: tokio::sync::Mutex::new(engine),
        }
    }

    /// Process one message, holding the engine lock for the whole run.
    pub async fn process(
        &self,
        input: &str,
        knowledge: Option<&KnowledgeContext>,
        extra_tools: &[Arc<dyn Tool>],
    ) -> Result<RunOutcome, RunFailure> {
        let mut engine = self.engine.lock().await;
        engine.process(input, knowledge, extra_tools).await
    }

    /// Wipe the agent's conversation memory.
    pub async fn clear_memory(&self) {
        let mut engine = self.engine.lock().await;
        engine.clear_memory();
        info!(agent = %self.name, "memory cleared");
    }

    /// Number of messages currently in the agent's memory.
    pub async fn memory_len(&self) -> usize {
        self.engine.lock().await.memory_len()
    }
}

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Maps agent names to agents and routes messages to them.
#[derive(Default)]
pub struct AgentRegistry {
    agents: RwLock<HashMap<String, Arc<Agent>>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent. Fails if the name is already taken.
    pub fn register(&self, agent: Agent) -> Result<(), AgentRegistryError> {
        let name = agent.name.clone();
        let mut table = self.agents.write().expect("agent table poisoned");
        if table.contains_key(&name) {
            return Err(AgentRegistryError::DuplicateAgent(name));
        }
        info!(agent = %name, "registered agent");
        table.insert(name, Arc::new(agent));
        Ok(())
    }

    /// Look up an agent by name.
    pub fn get(&self, name: &str) -> Option<Arc<Agent>> {
        self.agents
            .read()
            .expect("agent table poisoned")
            .get(name)
            .cloned()
    }

    /// Name + description for every registered agent, sorted by name.
    pub fn list(&self) -> Vec<AgentInfo> {
        let table = self.agents.read().expect("agent table poisoned");
        let mut infos: Vec<AgentInfo> = table
            .values()
            .map(|a| AgentInfo {
                name: a.name.clone(),
                description: a.description.clone(),
            })
            .collect();
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        infos
    }

    /// Number of registered agents.
    pub fn len(&self) -> usize {
        self.agents.read().expect("agent table poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route one message to a named agent.
    ///
    /// The table lock is released before the engine await; dispatches to
    /// different agents never block each other.
    pub async fn dispatch(
        &self,
        agent_name: &str,
        input: &str,
        knowledge: Option<&KnowledgeContext>,
        extra_tools: &[Arc<dyn Tool>],
    ) -> Result<RunOutcome, DispatchError> {
        let agent = self
            .get(agent_name)
            .ok_or_else(|| DispatchError::AgentNotFound(agent_name.to_string()))?;

        debug!(agent = %agent_name, "dispatching message");
        Ok(agent.process(input, knowledge, extra_tools).await?)
    }

    /// Wipe a named agent's conversation memory.
    pub async fn clear_memory(&self, agent_name: &str) -> Result<(), AgentRegistryError> {
        let agent = self
            .get(agent_name)
            .ok_or_else(|| AgentRegistryError::AgentNotFound(agent_name.to_string()))?;
        agent.clear_memory().await;
        Ok(())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
