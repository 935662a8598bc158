//! Convenience re-exports for common use.

pub use crate::agent::{Agent, AgentEvent, EventSink, TurnOutcome, UserInput};
pub use crate::config::AgentConfig;
pub use crate::error::{PalaverError, Result, ToolError};
pub use crate::memory::ConversationMemory;
pub use crate::provider::{ChatProvider, ChatRequest, FragmentStream};
pub use crate::stream::{AggregatedReply, StreamAggregator};
pub use crate::tools::{FnTool, ParamSpec, Tool, ToolArguments, ToolCatalog, ToolSpec};
pub use crate::types::{
    FinishReason, GenerationSettings, ImageRef, Message, Role, StreamFragment, ToolCallDelta,
    ToolCallRequest, ToolCallResult,
};

#[cfg(feature = "openai")]
pub use crate::provider::OpenAiProvider;
