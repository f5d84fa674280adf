//! Configuration schema — the typed shape of `~/.relaybot/config.json`.
//!
//! Hierarchy: `Config` → `GatewayConfig`, `AgentsConfig`, `ModelConfig`,
//! `KnowledgeConfig`, `ToolsConfig`.
//!
//! JSON on disk uses **camelCase** keys; Rust uses snake_case.
//! We use `#[serde(rename_all = "camelCase")]` to handle the conversion.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────
// Root Config
// ─────────────────────────────────────────────

/// Root configuration — loaded from `~/.relaybot/config.json` + env vars.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub agents: AgentsConfig,
    pub model: ModelConfig,
    pub knowledge: KnowledgeConfig,
    pub tools: ToolsConfig,
}

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// WebSocket gateway listener settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayConfig {
    /// Bind address for the WebSocket listener.
    pub host: String,
    /// Bind port.
    pub port: u16,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8765,
        }
    }
}

impl GatewayConfig {
    /// The `host:port` string to bind.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ─────────────────────────────────────────────
// Agents
// ─────────────────────────────────────────────

/// Agent configuration container.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentsConfig {
    pub defaults: AgentDefaults,
}

/// Default agent settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentDefaults {
    /// Default model identifier sent to the inference API.
    pub model: String,
    /// Maximum tokens to generate per response.
    pub max_tokens: u32,
    /// Sampling temperature (0.0 – 2.0).
    pub temperature: f64,
    /// Maximum reason/act iterations before forcing a degraded answer.
    pub max_iterations: u32,
}

impl Default for AgentDefaults {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 4096,
            temperature: 0.7,
            max_iterations: 3,
        }
    }
}

// ─────────────────────────────────────────────
// Model client
// ─────────────────────────────────────────────

/// Settings for the model inference collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelConfig {
    /// API key for Bearer authentication.
    pub api_key: String,
    /// Base URL of an OpenAI-compatible API.
    pub api_base: String,
    /// Per-call timeout in seconds. A timeout aborts the current run.
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.openai.com/v1".to_string(),
            timeout_secs: 60,
        }
    }
}

impl ModelConfig {
    /// Whether an API key is present.
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

// ─────────────────────────────────────────────
// Knowledge client
// ─────────────────────────────────────────────

/// Settings for the semantic-search collaborator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KnowledgeConfig {
    /// Base URL of the knowledge service.
    pub base_url: String,
    /// Disable to skip retrieval entirely (agents still run).
    pub enabled: bool,
    /// How many passages to request per lookup.
    pub limit: u32,
    /// Per-call timeout in seconds. A timeout degrades to "no context".
    pub timeout_secs: u64,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8004".to_string(),
            enabled: false,
            limit: 5,
            timeout_secs: 10,
        }
    }
}

// ─────────────────────────────────────────────
// Tools
// ─────────────────────────────────────────────

/// Tool execution settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ToolsConfig {
    /// Per-invocation timeout in seconds. A timed-out tool becomes an
    /// error observation; the loop keeps going.
    pub invoke_timeout_secs: u64,
    /// API key for the weather tool. Empty disables the tool.
    pub weather_api_key: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            invoke_timeout_secs: 30,
            weather_api_key: String::new(),
        }
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
