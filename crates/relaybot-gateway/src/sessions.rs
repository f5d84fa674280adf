//! Session manager — live WebSocket connections and their outbound queues.
//!
//! Each connection gets a bounded mpsc channel; the writer task on the
//! connection drains it into the socket. Sends are best-effort: a session
//! whose channel is gone is pruned on the spot, so a dead client can never
//! wedge a broadcast.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, warn};

use relaybot_core::wire::ServerFrame;

/// Outbound queue depth per connection.
const SESSION_QUEUE_DEPTH: usize = 64;

struct Session {
    tx: mpsc::Sender<ServerFrame>,
    connected_at: DateTime<Utc>,
}

/// Tracks connected clients keyed by connection id.
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<String, Session>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection. Returns the receiving half for the
    /// connection's writer task.
    pub async fn connect(&self, id: impl Into<String>) -> mpsc::Receiver<ServerFrame> {
        let id = id.into();
        let (tx, rx) = mpsc::channel(SESSION_QUEUE_DEPTH);
        let mut sessions = self.sessions.lock().await;
        sessions.insert(
            id.clone(),
            Session {
                tx,
                connected_at: Utc::now(),
            },
        );
        debug!(session = %id, total = sessions.len(), "session connected");
        rx
    }

    /// Remove a connection. Idempotent; unknown ids are a no-op.
    pub async fn disconnect(&self, id: &str) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.remove(id) {
            debug!(
                session = %id,
                connected_secs = (Utc::now() - session.connected_at).num_seconds(),
                total = sessions.len(),
                "session disconnected"
            );
        }
    }

    /// Queue a frame for one session. Best-effort: if the session is gone
    /// or its queue is closed, the session is dropped and the frame lost.
    ///
    /// The table lock is released before the queue await: a session with a
    /// full queue delays only its own caller, never another session's
    /// `send`, `connect`, or `disconnect`.
    pub async fn send(&self, id: &str, frame: ServerFrame) {
        let tx = {
            let sessions = self.sessions.lock().await;
            let Some(session) = sessions.get(id) else {
                debug!(session = %id, "send to unknown session dropped");
                return;
            };
            session.tx.clone()
        };
        if tx.send(frame).await.is_err() {
            warn!(session = %id, "session queue closed, pruning");
            self.sessions.lock().await.remove(id);
        }
    }

    /// Queue a frame for every connected session.
    pub async fn broadcast(&self, frame: ServerFrame) {
        // Snapshot ids first so pruning inside `send` stays simple.
        let ids: Vec<String> = {
            let sessions = self.sessions.lock().await;
            sessions.keys().cloned().collect()
        };
        for id in ids {
            self.send(&id, frame.clone()).await;
        }
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
