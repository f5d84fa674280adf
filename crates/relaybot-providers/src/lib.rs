//! Collaborator clients for Relaybot.
//!
//! # Architecture
//!
//! - [`traits::ModelClient`] — interface to a language-model inference
//!   collaborator; faults here are fatal to the current agent run
//! - [`traits::KnowledgeClient`] — interface to the semantic-search
//!   collaborator; faults here degrade to "no context"
//! - [`http_model::HttpModelClient`] — OpenAI-compatible HTTP implementation
//! - [`knowledge::HttpKnowledgeClient`] — HTTP search-service implementation

pub mod http_model;
pub mod knowledge;
pub mod traits;

// Re-export main types for convenience
pub use http_model::HttpModelClient;
pub use knowledge::HttpKnowledgeClient;
pub use traits::{
    KnowledgeClient, KnowledgeError, ModelClient, ModelClientError, ModelRequestConfig,
};
