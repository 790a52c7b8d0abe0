mod router;
mod session;

pub use router::{ChatIntent, ChatRouter, DEFAULT_CONTEXT_WINDOW};
pub use session::ChatSession;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Ordered conversation log. The full sequence is retained for display; only
/// the most recent bounded window is forwarded as transport context.
#[derive(Clone, Debug, Default)]
pub struct ChatHistory {
    messages: Vec<ChatMessage>,
}

impl ChatHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// Most recent `window` messages, oldest first.
    pub fn context_window(&self, window: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(window);
        &self.messages[start..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_window_is_bounded_suffix() {
        let mut history = ChatHistory::new();
        for i in 0..15 {
            history.push(ChatMessage::user(format!("message {i}")));
        }

        let window = history.context_window(10);
        assert_eq!(window.len(), 10);
        assert_eq!(window[0].content, "message 5");
        assert_eq!(window[9].content, "message 14");
        assert_eq!(history.len(), 15, "older messages stay retained for display");
    }

    #[test]
    fn test_context_window_smaller_history() {
        let mut history = ChatHistory::new();
        history.push(ChatMessage::user("hi"));
        assert_eq!(history.context_window(10).len(), 1);
    }
}
