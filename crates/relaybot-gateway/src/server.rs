//! WebSocket gateway — accepts client connections and routes chat requests
//! and admin commands to the agent registry.
//!
//! One reader loop and one writer task per connection. Replies travel
//! through the session manager's queue, so slow clients back-pressure their
//! own queue and nothing else. Every inbound frame produces exactly one
//! reply frame; malformed JSON gets an error frame rather than a hangup.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, error, info, warn};

use relaybot_agent::registry::DispatchError;
use relaybot_agent::tools::{Tool, ToolRegistry};
use relaybot_agent::AgentRegistry;
use relaybot_core::types::KnowledgeContext;
use relaybot_core::wire::{AdminCommand, ChatRequest, ClientFrame, FrameParseError, ServerFrame};
use relaybot_providers::KnowledgeClient;

use crate::sessions::SessionManager;

// ─────────────────────────────────────────────
// Gateway
// ─────────────────────────────────────────────

/// The WebSocket front door.
pub struct Gateway {
    registry: Arc<AgentRegistry>,
    sessions: Arc<SessionManager>,
    /// Pool of tools a chat request may name in its `tools` field.
    tool_pool: Arc<ToolRegistry>,
    /// Optional retrieval collaborator consulted before each chat dispatch.
    knowledge: Option<Arc<dyn KnowledgeClient>>,
    next_conn_id: AtomicU64,
}

impl Gateway {
    pub fn new(
        registry: Arc<AgentRegistry>,
        tool_pool: Arc<ToolRegistry>,
        knowledge: Option<Arc<dyn KnowledgeClient>>,
    ) -> Self {
        Self {
            registry,
            sessions: Arc::new(SessionManager::new()),
            tool_pool,
            knowledge,
            next_conn_id: AtomicU64::new(1),
        }
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        self.sessions.clone()
    }

    /// Bind and serve forever.
    pub async fn run(self: Arc<Self>, bind_addr: &str) -> anyhow::Result<()> {
        let listener = TcpListener::bind(bind_addr).await?;
        info!(addr = %bind_addr, "gateway listening");
        self.serve(listener).await
    }

    /// Accept loop over an already-bound listener. Exposed separately so
    /// tests can bind to an ephemeral port first.
    pub async fn serve(self: Arc<Self>, listener: TcpListener) -> anyhow::Result<()> {
        loop {
            let (stream, peer) = listener.accept().await?;
            let id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
            let session_id = format!("conn-{id}");
            debug!(session = %session_id, peer = %peer, "accepted connection");

            let gateway = self.clone();
            tokio::spawn(async move {
                if let Err(e) = gateway.handle_connection(stream, &session_id).await {
                    warn!(session = %session_id, error = %e, "connection ended with error");
                }
                gateway.sessions.disconnect(&session_id).await;
            });
        }
    }

    /// Drive one connection to completion.
    async fn handle_connection(&self, stream: TcpStream, session_id: &str) -> anyhow::Result<()> {
        let ws_stream = tokio_tungstenite::accept_async(stream).await?;
        let (mut write, mut read) = ws_stream.split();

        let mut outbound = self.sessions.connect(session_id).await;

        // Writer task: drain the session queue into the socket.
        let writer_session = session_id.to_string();
        let writer = tokio::spawn(async move {
            while let Some(frame) = outbound.recv().await {
                let text = match serde_json::to_string(&frame) {
                    Ok(t) => t,
                    Err(e) => {
                        error!(session = %writer_session, error = %e, "frame serialization failed");
                        continue;
                    }
                };
                if write.send(WsMessage::Text(text.into())).await.is_err() {
                    debug!(session = %writer_session, "socket write failed, writer exiting");
                    break;
                }
            }
            // Session gone or socket dead either way; close politely.
            let _ = write.close().await;
        });

        // Reader loop: one reply per inbound text frame.
        while let Some(msg) = read.next().await {
            match msg {
                Ok(WsMessage::Text(text)) => {
                    let reply = self.handle_frame(&text).await;
                    self.sessions.send(session_id, reply).await;
                }
                Ok(WsMessage::Close(_)) => {
                    debug!(session = %session_id, "client closed connection");
                    break;
                }
                Ok(WsMessage::Ping(_)) | Ok(WsMessage::Pong(_)) => {
                    // tungstenite answers pings itself
                }
                Ok(_) => {
                    self.sessions
                        .send(session_id, ServerFrame::error("Only text frames are supported"))
                        .await;
                }
                Err(e) => {
                    debug!(session = %session_id, error = %e, "socket read error");
                    break;
                }
            }
        }

        self.sessions.disconnect(session_id).await;
        let _ = writer.await;
        Ok(())
    }

    // ─────────────────────────────────────────
    // Frame handling
    // ─────────────────────────────────────────

    /// Parse and process one inbound frame, producing exactly one reply.
    async fn handle_frame(&self, raw: &str) -> ServerFrame {
        let frame = match ClientFrame::parse(raw) {
            Ok(f) => f,
            Err(FrameParseError::UnknownCommand(name)) => {
                debug!(command = %name, "unknown command");
                return ServerFrame::error(format!("Unknown command '{name}'"));
            }
            Err(e) => {
                debug!(error = %e, "unparseable client frame");
                return ServerFrame::error("Invalid request: expected a chat or command object");
            }
        };

        match frame {
            ClientFrame::Command(cmd) => self.handle_command(cmd).await,
            ClientFrame::Chat(req) => self.handle_chat(req).await,
        }
    }

    async fn handle_command(&self, cmd: AdminCommand) -> ServerFrame {
        match cmd {
            AdminCommand::ListAgents => ServerFrame::Agents {
                agents: self.registry.list(),
            },
            AdminCommand::ClearMemory { agent } => {
                match self.registry.clear_memory(&agent).await {
                    Ok(()) => ServerFrame::response(format!("Memory cleared for agent '{agent}'")),
                    Err(e) => ServerFrame::error(e.to_string()),
                }
            }
        }
    }

    async fn handle_chat(&self, req: ChatRequest) -> ServerFrame {
        if req.message.trim().is_empty() {
            return ServerFrame::error("Message cannot be empty");
        }

        let knowledge = self.fetch_knowledge(&req.message).await;
        let extra_tools = self.resolve_extra_tools(req.tools.as_deref());

        match self
            .registry
            .dispatch(&req.agent, &req.message, knowledge.as_ref(), &extra_tools)
            .await
        {
            Ok(outcome) => {
                if outcome.degraded {
                    debug!(agent = %req.agent, steps = outcome.steps.len(), "degraded answer");
                }
                ServerFrame::response(outcome.answer)
            }
            Err(DispatchError::AgentNotFound(name)) => {
                ServerFrame::error(format!("Agent '{name}' not found"))
            }
            Err(DispatchError::Run(failure)) => {
                error!(agent = %req.agent, error = %failure, "agent run failed");
                ServerFrame::error(format!("Agent run failed: {failure}"))
            }
        }
    }

    /// Consult the knowledge collaborator, degrading to no context on any
    /// failure. Retrieval never blocks a chat.
    async fn fetch_knowledge(&self, query: &str) -> Option<KnowledgeContext> {
        let client = self.knowledge.as_ref()?;
        match client.search(query).await {
            Ok(ctx) if !ctx.is_empty() => Some(ctx),
            Ok(_) => None,
            Err(e) => {
                warn!(error = %e, "knowledge lookup failed, continuing without context");
                None
            }
        }
    }

    /// Resolve the request's extra tool names against the shared pool.
    /// Unknown names are skipped with a warning rather than failing the chat.
    fn resolve_extra_tools(&self, names: Option<&[String]>) -> Vec<Arc<dyn Tool>> {
        let Some(names) = names else {
            return Vec::new();
        };
        names
            .iter()
            .filter_map(|name| {
                let tool = self.tool_pool.resolve(name);
                if tool.is_none() {
                    warn!(tool = %name, "requested tool not in pool, skipping");
                }
                tool
            })
            .collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
