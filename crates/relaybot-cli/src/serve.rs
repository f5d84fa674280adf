//! `relaybot serve` — wire up agents, tools, and collaborators, then run
//! the gateway.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{info, warn};

use relaybot_agent::tools::{
    CalculatorTool, ClockTool, HttpRequestTool, KnowledgeSearchTool, ToolRegistry, WeatherTool,
};
use relaybot_agent::{Agent, AgentLoop, AgentRegistry, EchoEngine};
use relaybot_core::config::{load_config, Config};
use relaybot_gateway::Gateway;
use relaybot_providers::{
    HttpKnowledgeClient, HttpModelClient, KnowledgeClient, ModelClient, ModelRequestConfig,
};

/// Run the gateway until killed.
pub async fn run() -> Result<()> {
    let config = load_config(None);

    let knowledge = build_knowledge_client(&config);
    let registry = Arc::new(AgentRegistry::new());
    let tool_pool = Arc::new(build_tool_pool(&config, knowledge.clone())?);

    register_agents(&registry, &config, knowledge.clone())?;

    let bind_addr = config.gateway.bind_addr();
    let gateway = Arc::new(Gateway::new(registry, tool_pool, knowledge));
    gateway.run(&bind_addr).await
}

/// The shared pool of tools a chat request may name in its `tools` field.
/// The default agent gets the same set bound permanently.
fn build_tool_pool(
    config: &Config,
    knowledge: Option<Arc<dyn KnowledgeClient>>,
) -> Result<ToolRegistry> {
    let mut pool = ToolRegistry::new();
    pool.register(Arc::new(CalculatorTool))?;
    pool.register(Arc::new(ClockTool))?;
    pool.register(Arc::new(HttpRequestTool::new()))?;
    if !config.tools.weather_api_key.is_empty() {
        pool.register(Arc::new(WeatherTool::new(
            config.tools.weather_api_key.as_str(),
        )))?;
    }
    if let Some(client) = knowledge {
        pool.register(Arc::new(KnowledgeSearchTool::new(client)))?;
    }
    Ok(pool)
}

fn build_knowledge_client(config: &Config) -> Option<Arc<dyn KnowledgeClient>> {
    if !config.knowledge.enabled {
        return None;
    }
    match HttpKnowledgeClient::new(
        &config.knowledge.base_url,
        config.knowledge.limit,
        config.knowledge.timeout_secs,
    ) {
        Ok(client) => {
            info!(base_url = %config.knowledge.base_url, "knowledge retrieval enabled");
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!(error = %e, "knowledge client unavailable, retrieval disabled");
            None
        }
    }
}

fn register_agents(
    registry: &AgentRegistry,
    config: &Config,
    knowledge: Option<Arc<dyn KnowledgeClient>>,
) -> Result<()> {
    if config.model.is_configured() {
        let model = build_model_client(config)?;
        let tools = build_tool_pool(config, knowledge)?;

        let agent_loop = AgentLoop::new("default", model, tools)
            .with_max_iterations(config.agents.defaults.max_iterations as usize)
            .with_tool_timeout(Duration::from_secs(config.tools.invoke_timeout_secs));

        registry.register(Agent::new(
            "default",
            "A general-purpose tool-using assistant",
            Box::new(agent_loop),
        ))?;
    } else {
        warn!("no model API key configured, 'default' agent will echo");
        registry.register(Agent::new(
            "default",
            "Echoes messages back (no model configured)",
            Box::new(EchoEngine::new()),
        ))?;
    }

    registry.register(Agent::new(
        "echo",
        "Echoes messages back without calling a model",
        Box::new(EchoEngine::new()),
    ))?;

    info!(agents = registry.len(), "agents registered");
    Ok(())
}

fn build_model_client(config: &Config) -> Result<Arc<dyn ModelClient>> {
    let defaults = &config.agents.defaults;
    let client = HttpModelClient::new(
        &config.model.api_base,
        &config.model.api_key,
        &defaults.model,
        config.model.timeout_secs,
        ModelRequestConfig {
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        },
    )
    .context("failed to build model client")?;

    info!(model = %defaults.model, api_base = %config.model.api_base, "model client ready");
    Ok(Arc::new(client))
}
