//! Turn event stream for live display.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ModelCallPhase;
use crate::types::{ToolCallRequest, ToolCallResult};

pub type TurnId = Uuid;

/// Observable progress of a turn.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    TurnStarted {
        turn_id: TurnId,
    },
    /// A piece of model text, delivered as soon as it is streamed.
    TextDelta {
        turn_id: TurnId,
        phase: ModelCallPhase,
        text: String,
    },
    ToolCallRequested {
        turn_id: TurnId,
        request: ToolCallRequest,
    },
    ToolResult {
        turn_id: TurnId,
        result: ToolCallResult,
        is_error: bool,
    },
    TurnCompleted {
        turn_id: TurnId,
        answer: String,
    },
    TurnFailed {
        turn_id: TurnId,
        error: String,
    },
}

/// Callback receiving every [`AgentEvent`].
pub type EventSink = Arc<dyn Fn(AgentEvent) + Send + Sync>;

#[derive(Clone, Default)]
pub(crate) struct EventEmitter {
    sink: Option<EventSink>,
}

impl EventEmitter {
    pub(crate) fn new(sink: Option<EventSink>) -> Self {
        Self { sink }
    }

    pub(crate) fn emit(&self, event: AgentEvent) {
        let Some(sink) = &self.sink else {
            return;
        };
        (sink)(event);
    }
}
