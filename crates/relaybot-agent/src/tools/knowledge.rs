//! Knowledge search tool — lets the model query the knowledge collaborator
//! explicitly, in addition to the passive retrieval the gateway performs.
//!
//! Collaborator failures come back as `Err` and are folded into the step
//! trace by the registry; they never abort the loop.

use std::sync::Arc;

use async_trait::async_trait;

use relaybot_core::types::KnowledgeContext;
use relaybot_providers::KnowledgeClient;

use super::base::Tool;

/// Searches the knowledge base. Input is the search query.
pub struct KnowledgeSearchTool {
    client: Arc<dyn KnowledgeClient>,
}

impl KnowledgeSearchTool {
    pub fn new(client: Arc<dyn KnowledgeClient>) -> Self {
        Self { client }
    }
}

/// Render passages as a numbered list the model can cite from.
pub fn format_context(ctx: &KnowledgeContext) -> String {
    if ctx.is_empty() {
        return "No relevant information found in the knowledge base.".to_string();
    }

    let mut out = String::from("Found the following relevant passages:\n");
    for (i, p) in ctx.passages.iter().enumerate() {
        out.push_str(&format!("\n{}. {}", i + 1, p.content));
        if let Some(source) = &p.source {
            out.push_str(&format!("\n   Source: {source}"));
        }
        if let Some(score) = p.score {
            out.push_str(&format!("\n   Relevance: {score:.2}"));
        }
    }
    out
}

#[async_trait]
impl Tool for KnowledgeSearchTool {
    fn name(&self) -> &str {
        "search_knowledge"
    }

    fn description(&self) -> &str {
        "Search the knowledge base for relevant information. Input is a search query."
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let ctx = self
            .client
            .search(input)
            .await
            .map_err(|e| anyhow::anyhow!("knowledge search failed: {e}"))?;
        Ok(format_context(&ctx))
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
