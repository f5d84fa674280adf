//! Relaybot agent core — the reasoning loop, conversation memory, tools,
//! and the registry that routes messages between named agents.

pub mod agent_loop;
pub mod engine;
pub mod memory;
pub mod registry;
pub mod tools;

pub use agent_loop::{AgentLoop, RunFailure, DEFAULT_MAX_ITERATIONS};
pub use engine::{AgentEngine, EchoEngine};
pub use memory::ConversationMemory;
pub use registry::{Agent, AgentRegistry, AgentRegistryError, DispatchError};
pub use tools::{Tool, ToolRegistry, ToolRegistryError};
