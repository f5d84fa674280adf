//! Conversation memory — the per-agent ordered transcript.
//!
//! Append-only except for an explicit `clear()`. Insertion order is the turn
//! order and is replayed verbatim to the model on every iteration. Exactly
//! one run mutates a given memory at a time; the registry's per-agent lock
//! enforces that, not this type.

use relaybot_core::types::ChatMessage;

/// Ordered transcript owned by a single agent instance.
#[derive(Clone, Debug, Default)]
pub struct ConversationMemory {
    messages: Vec<ChatMessage>,
}

impl ConversationMemory {
    /// Create an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a committed message. Messages are immutable once appended.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// The full transcript, in turn order.
    pub fn transcript(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Truncate to empty (reset conversation).
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Number of committed messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relaybot_core::types::Role;

    #[test]
    fn test_push_preserves_order() {
        let mut memory = ConversationMemory::new();
        memory.push(ChatMessage::user("first"));
        memory.push(ChatMessage::tool_record("clock", "", "10:00"));
        memory.push(ChatMessage::assistant("second"));

        let roles: Vec<Role> = memory.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Tool, Role::Assistant]);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut memory = ConversationMemory::new();
        memory.push(ChatMessage::user("hello"));

        memory.clear();
        assert!(memory.is_empty());

        // A second clear is a no-op, not an error.
        memory.clear();
        assert!(memory.is_empty());
        assert_eq!(memory.len(), 0);
    }
}
