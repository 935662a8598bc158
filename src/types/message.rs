//! Transcript messages and their wire rendering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use strum::{Display, EnumString};

use super::image::ImageRef;

/// Conversation role.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    Developer,
    User,
    Assistant,
    Tool,
}

/// A tool invocation the model asked for.
///
/// `arguments` is the raw JSON text exactly as streamed; it is only parsed
/// when the tool is invoked.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCallRequest {
    pub slot_index: usize,
    pub call_id: String,
    pub tool_name: String,
    pub arguments: String,
}

impl ToolCallRequest {
    pub fn new(
        slot_index: usize,
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            slot_index,
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments: arguments.into(),
        }
    }

    fn to_wire(&self) -> Value {
        json!({
            "id": self.call_id,
            "type": "function",
            "function": {
                "name": self.tool_name,
                "arguments": self.arguments,
            }
        })
    }
}

/// Outcome of one executed tool call, correlated to its request by `call_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCallResult {
    pub call_id: String,
    pub content: String,
}

impl ToolCallResult {
    pub fn new(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            content: content.into(),
        }
    }
}

/// The single payload shape carried by a [`Message`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum MessagePayload {
    Text(String),
    Images(Vec<ImageRef>),
    ToolCalls(Vec<ToolCallRequest>),
    ToolResult(ToolCallResult),
}

/// One transcript entry. Immutable once stored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    role: Role,
    payload: MessagePayload,
    created_at: DateTime<Utc>,
}

impl Message {
    pub(crate) fn text(role: Role, text: impl Into<String>) -> Self {
        Self::with_payload(role, MessagePayload::Text(text.into()))
    }

    pub(crate) fn images(role: Role, images: Vec<ImageRef>) -> Self {
        Self::with_payload(role, MessagePayload::Images(images))
    }

    pub(crate) fn tool_calls(requests: Vec<ToolCallRequest>) -> Self {
        Self::with_payload(Role::Assistant, MessagePayload::ToolCalls(requests))
    }

    pub(crate) fn tool_result(result: ToolCallResult) -> Self {
        Self::with_payload(Role::Tool, MessagePayload::ToolResult(result))
    }

    fn with_payload(role: Role, payload: MessagePayload) -> Self {
        Self {
            role,
            payload,
            created_at: Utc::now(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn payload(&self) -> &MessagePayload {
        &self.payload
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Text content, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match &self.payload {
            MessagePayload::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Render in the chat-completions message shape.
    ///
    /// Image parts render as `"type": "image_url"` parts carrying
    /// `image_url.url`; the endpoint does not accept bare `"image"` parts.
    pub fn to_wire(&self) -> Value {
        match &self.payload {
            MessagePayload::Text(text) => json!({
                "role": self.role,
                "content": text,
            }),
            MessagePayload::Images(images) => {
                let parts: Vec<Value> = images
                    .iter()
                    .map(|image| {
                        json!({
                            "type": "image_url",
                            "image_url": { "url": image.to_url() }
                        })
                    })
                    .collect();
                json!({
                    "role": self.role,
                    "content": parts,
                })
            }
            MessagePayload::ToolCalls(requests) => json!({
                "role": self.role,
                "tool_calls": requests.iter().map(ToolCallRequest::to_wire).collect::<Vec<_>>(),
            }),
            MessagePayload::ToolResult(result) => json!({
                "role": self.role,
                "tool_call_id": result.call_id,
                "content": result.content,
            }),
        }
    }
}
