//! Rolling conversation transcript.
//!
//! The full history is kept; only the rendered view is bounded to the most
//! recent `max_size` messages.

use serde_json::Value;
use tracing::debug;

use crate::types::{ImageRef, Message, Role, ToolCallRequest, ToolCallResult};

/// Default number of messages sent to the model.
pub const DEFAULT_MAX_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct ConversationMemory {
    messages: Vec<Message>,
    max_size: usize,
}

impl Default for ConversationMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::with_max_size(DEFAULT_MAX_SIZE)
    }

    /// A `max_size` of zero is raised to one.
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Append a text message. Empty text is ignored.
    pub fn append_text(&mut self, role: Role, text: impl Into<String>) -> usize {
        let text = text.into();
        if text.is_empty() {
            return 0;
        }
        self.push(Message::text(role, text))
    }

    /// Append one message holding every image. An empty list is ignored.
    pub fn append_images(&mut self, role: Role, images: Vec<ImageRef>) -> usize {
        if images.is_empty() {
            return 0;
        }
        self.push(Message::images(role, images))
    }

    /// Append one assistant message holding every requested call.
    pub fn append_tool_calls(&mut self, requests: Vec<ToolCallRequest>) -> usize {
        if requests.is_empty() {
            return 0;
        }
        self.push(Message::tool_calls(requests))
    }

    /// Append one tool message per result, in the given order.
    pub fn append_tool_results(&mut self, results: impl IntoIterator<Item = ToolCallResult>) -> usize {
        results
            .into_iter()
            .map(|result| self.push(Message::tool_result(result)))
            .sum()
    }

    fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        1
    }

    /// The most recent `max_size` messages, oldest first.
    pub fn window(&self) -> &[Message] {
        let start = self.messages.len().saturating_sub(self.max_size);
        &self.messages[start..]
    }

    /// Whether the window begins on a tool result whose tool-call message
    /// has already dropped out of it.
    pub fn window_starts_mid_round(&self) -> bool {
        self.window()
            .first()
            .is_some_and(|message| message.role() == Role::Tool)
    }

    /// The window in wire form.
    ///
    /// The window is cut purely by count, so it may open on orphaned tool
    /// results, which chat-completions endpoints reject.
    pub fn render(&self) -> Vec<Value> {
        if self.window_starts_mid_round() {
            debug!(
                max_size = self.max_size,
                "rendered window starts on a tool result without its tool calls"
            );
        }
        self.window().iter().map(Message::to_wire).collect()
    }

    /// Full stored history.
    pub fn messages(&self) -> &[Message] {
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
}
