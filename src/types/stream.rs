//! Incremental response fragments produced by a provider stream.

use serde::{Deserialize, Serialize};

use super::generation::FinishReason;

/// One piece of a tool call as it streams in.
///
/// `id` and `name` normally arrive only on the first delta for a slot;
/// `arguments` arrives piecewise.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCallDelta {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

impl ToolCallDelta {
    /// First delta of a slot, carrying the call id and tool name.
    pub fn start(index: usize, id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            index,
            id: Some(id.into()),
            name: Some(name.into()),
            arguments: None,
        }
    }

    /// A later delta carrying only argument text.
    pub fn arguments(index: usize, fragment: impl Into<String>) -> Self {
        Self {
            index,
            arguments: Some(fragment.into()),
            ..Default::default()
        }
    }
}

/// One incremental unit of a streamed reply.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StreamFragment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCallDelta>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl StreamFragment {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }

    pub fn tool_call(delta: ToolCallDelta) -> Self {
        Self {
            tool_calls: vec![delta],
            ..Default::default()
        }
    }

    pub fn finished(reason: FinishReason) -> Self {
        Self {
            finish_reason: Some(reason),
            ..Default::default()
        }
    }

    /// Whether the fragment carries nothing at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.tool_calls.is_empty() && self.finish_reason.is_none()
    }
}
