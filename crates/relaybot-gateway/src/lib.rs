//! Relaybot gateway — WebSocket server, session tracking, and frame routing.

pub mod server;
pub mod sessions;

pub use server::Gateway;
pub use sessions::SessionManager;
