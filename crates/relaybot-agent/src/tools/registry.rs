//! Tool Registry — named tools and their dispatch path.
//!
//! Registration happens once at startup, outside the loop's concurrency
//! domain; the registry is immutable thereafter. `invoke` upholds the
//! never-crash contract: unresolvable tools, tool faults, and timeouts all
//! come back as error strings, never as errors.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use relaybot_core::types::ToolDescriptor;

use super::base::Tool;

/// Registration failures.
#[derive(Debug, Error, PartialEq)]
pub enum ToolRegistryError {
    #[error("tool '{0}' is already registered")]
    DuplicateTool(String),
}

// ─────────────────────────────────────────────
// Registry
// ─────────────────────────────────────────────

/// Stores tools keyed by name and dispatches calls.
///
/// Owns `Arc<dyn Tool>` so tools can be shared across agents and requests.
/// Registration order is remembered so `list()` produces the same prompt
/// catalogue on every run with an identical tool set.
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
    order: Vec<String>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Fails if the name is already taken.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), ToolRegistryError> {
        let name = tool.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(ToolRegistryError::DuplicateTool(name));
        }
        info!(tool = %name, "registered tool");
        self.order.push(name.clone());
        self.tools.insert(name, tool);
        Ok(())
    }

    /// Look up a tool by name (case-sensitive exact match).
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Check if a tool is registered.
    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Descriptors for all registered tools, in registration order.
    pub fn list(&self) -> Vec<ToolDescriptor> {
        self.order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| t.descriptor())
            .collect()
    }

    /// Execute a tool by name with the given payload, bounded by `timeout`.
    ///
    /// The model always gets a `String` back, even on failure — a missing
    /// tool, a tool fault, and a timeout are observations, not crashes.
    pub async fn invoke(&self, name: &str, input: &str, timeout: Duration) -> String {
        let tool = match self.tools.get(name) {
            Some(t) => t.clone(),
            None => {
                warn!(tool = %name, "tool not found");
                return format!("Error: tool '{name}' not found");
            }
        };
        invoke_tool(&tool, input, timeout).await
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

/// Invoke a single tool under a timeout, converting any fault to an error
/// string.
///
/// Shared by the registry and the loop's per-request extra tools, so both
/// paths recover identically.
pub async fn invoke_tool(tool: &Arc<dyn Tool>, input: &str, timeout: Duration) -> String {
    let name = tool.name().to_string();
    match tokio::time::timeout(timeout, tool.invoke(input)).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            warn!(tool = %name, error = %e, "tool execution failed");
            format!("Error executing {name}: {e}")
        }
        Err(_) => {
            warn!(tool = %name, timeout_secs = timeout.as_secs(), "tool timed out");
            format!(
                "Error executing {name}: timed out after {}s",
                timeout.as_secs()
            )
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
