//! Relaybot core — shared types, wire protocol, and configuration.
//!
//! This crate contains:
//! - **types**: conversation messages, step traces, model replies, knowledge
//!   context
//! - **wire**: the JSON frames exchanged with WebSocket clients
//! - **config**: schema + loader for `~/.relaybot/config.json`
//! - **utils**: path helpers

pub mod config;
pub mod types;
pub mod utils;
pub mod wire;
