//! The turn state machine.
//!
//! A turn moves through
//! `AwaitingUserInput -> ModelCall1 -> (PlainAnswer | ToolDispatch -> ModelCall2 -> PlainAnswer)`.
//! The follow-up call is sent without tools, so a turn never runs more than
//! one tool round.

use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use super::events::{AgentEvent, EventEmitter, EventSink, TurnId};
use crate::error::{ModelCallPhase, PalaverError, Result};
use crate::memory::ConversationMemory;
use crate::provider::{ChatProvider, ChatRequest};
use crate::stream::{AggregatedReply, StreamAggregator};
use crate::tools::{Tool, ToolCatalog};
use crate::types::{GenerationSettings, ImageRef, Role, ToolCallRequest, ToolCallResult};

/// What the user contributes to a turn: text, images, or both.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserInput {
    pub text: String,
    pub images: Vec<ImageRef>,
}

impl UserInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            images: Vec::new(),
        }
    }

    pub fn with_images(mut self, images: impl IntoIterator<Item = ImageRef>) -> Self {
        self.images.extend(images);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.images.is_empty()
    }
}

/// States of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    AwaitingUserInput,
    ModelCall1,
    ToolDispatch,
    ModelCall2,
    PlainAnswer,
}

/// Result of a completed turn.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnOutcome {
    pub turn_id: TurnId,
    pub answer: String,
    /// Results of the tool round, in slot order. Empty for a plain answer.
    pub tool_results: Vec<ToolCallResult>,
    /// Number of model calls made (1 or 2).
    pub model_calls: u32,
}

/// Conversational agent owning its transcript and tool catalog.
///
/// One turn at a time: `run_turn` takes `&mut self`.
pub struct Agent {
    provider: Box<dyn ChatProvider>,
    model: String,
    settings: GenerationSettings,
    tools: ToolCatalog,
    memory: ConversationMemory,
    events: EventEmitter,
}

impl Agent {
    pub fn new(provider: impl ChatProvider + 'static, model: impl Into<String>) -> Self {
        Self {
            provider: Box::new(provider),
            model: model.into(),
            settings: GenerationSettings::default(),
            tools: ToolCatalog::new(),
            memory: ConversationMemory::new(),
            events: EventEmitter::default(),
        }
    }

    /// Build an agent backed by the OpenAI provider.
    #[cfg(feature = "openai")]
    pub fn from_config(config: &crate::config::AgentConfig) -> Result<Self> {
        let provider = crate::provider::OpenAiProvider::from_config(config)?;
        Ok(Self::new(provider, config.model.clone())
            .with_settings(config.settings.clone())
            .with_memory(ConversationMemory::with_max_size(config.max_memory)))
    }

    /// Append a developer instruction to the transcript.
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.memory.append_text(Role::Developer, prompt);
        self
    }

    pub fn with_event_sink(mut self, sink: EventSink) -> Self {
        self.events = EventEmitter::new(Some(sink));
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the transcript, e.g. to change its bound.
    pub fn with_memory(mut self, memory: ConversationMemory) -> Self {
        self.memory = memory;
        self
    }

    pub fn with_tools(mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) -> Self {
        self.add_tools(tools);
        self
    }

    pub fn add_tools(&mut self, tools: impl IntoIterator<Item = Arc<dyn Tool>>) {
        self.tools.register(tools);
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn tools(&self) -> &ToolCatalog {
        &self.tools
    }

    pub fn tools_mut(&mut self) -> &mut ToolCatalog {
        &mut self.tools
    }

    pub fn memory(&self) -> &ConversationMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut ConversationMemory {
        &mut self.memory
    }

    /// Run a text-only turn and return the final answer.
    pub async fn chat(&mut self, text: impl Into<String>) -> Result<String> {
        Ok(self.run_turn(UserInput::text(text)).await?.answer)
    }

    /// Run a turn with text and images and return the final answer.
    pub async fn chat_with_images(
        &mut self,
        text: impl Into<String>,
        images: Vec<ImageRef>,
    ) -> Result<String> {
        Ok(self
            .run_turn(UserInput::text(text).with_images(images))
            .await?
            .answer)
    }

    /// Drive one turn to completion.
    ///
    /// Only a failed model call is returned as an error; it is wrapped in
    /// [`PalaverError::RemoteCall`] and leaves the transcript as it was
    /// before that call. Tool failures are reported to the model instead.
    pub async fn run_turn(&mut self, input: UserInput) -> Result<TurnOutcome> {
        if input.is_empty() {
            return Err(PalaverError::InvalidArgument(
                "user input has neither text nor images".into(),
            ));
        }

        let turn_id = Uuid::new_v4();
        self.events.emit(AgentEvent::TurnStarted { turn_id });
        debug!(%turn_id, model = %self.model, "turn started");

        match self.drive(turn_id, input).await {
            Ok(outcome) => {
                info!(
                    %turn_id,
                    model_calls = outcome.model_calls,
                    tool_calls = outcome.tool_results.len(),
                    "turn completed"
                );
                self.events.emit(AgentEvent::TurnCompleted {
                    turn_id,
                    answer: outcome.answer.clone(),
                });
                Ok(outcome)
            }
            Err(err) => {
                warn!(%turn_id, error = %err, "turn failed");
                self.events.emit(AgentEvent::TurnFailed {
                    turn_id,
                    error: err.to_string(),
                });
                Err(err)
            }
        }
    }

    async fn drive(&mut self, turn_id: TurnId, input: UserInput) -> Result<TurnOutcome> {
        let mut state = TurnState::AwaitingUserInput;
        let mut input = Some(input);
        let mut pending: Vec<ToolCallRequest> = Vec::new();
        let mut tool_results = Vec::new();
        let mut answer = String::new();
        let mut model_calls = 0;

        loop {
            debug!(%turn_id, ?state, "turn state");
            state = match state {
                TurnState::AwaitingUserInput => {
                    if let Some(UserInput { text, images }) = input.take() {
                        self.memory.append_text(Role::User, text);
                        self.memory.append_images(Role::User, images);
                    }
                    TurnState::ModelCall1
                }
                TurnState::ModelCall1 => {
                    model_calls += 1;
                    let reply = self.call_model(turn_id, ModelCallPhase::Initial).await?;
                    self.memory.append_text(Role::Assistant, reply.text.clone());
                    if reply.has_tool_calls() {
                        pending = reply.tool_calls;
                        TurnState::ToolDispatch
                    } else {
                        answer = reply.text;
                        TurnState::PlainAnswer
                    }
                }
                TurnState::ToolDispatch => {
                    self.memory.append_tool_calls(pending.clone());
                    for request in &pending {
                        self.events.emit(AgentEvent::ToolCallRequested {
                            turn_id,
                            request: request.clone(),
                        });
                        let (result, is_error) = self.tools.dispatch(request).await;
                        self.events.emit(AgentEvent::ToolResult {
                            turn_id,
                            result: result.clone(),
                            is_error,
                        });
                        tool_results.push(result);
                    }
                    self.memory.append_tool_results(tool_results.clone());
                    TurnState::ModelCall2
                }
                TurnState::ModelCall2 => {
                    model_calls += 1;
                    let reply = self.call_model(turn_id, ModelCallPhase::FollowUp).await?;
                    if reply.has_tool_calls() {
                        warn!(
                            %turn_id,
                            tool_calls = reply.tool_calls.len(),
                            "ignoring tool calls requested by the follow-up reply"
                        );
                    }
                    self.memory.append_text(Role::Assistant, reply.text.clone());
                    answer = reply.text;
                    TurnState::PlainAnswer
                }
                TurnState::PlainAnswer => break,
            };
        }

        Ok(TurnOutcome {
            turn_id,
            answer,
            tool_results,
            model_calls,
        })
    }

    /// One streamed model call over the current transcript.
    ///
    /// Tools are offered only on the initial call.
    async fn call_model(&self, turn_id: TurnId, phase: ModelCallPhase) -> Result<AggregatedReply> {
        let mut request =
            ChatRequest::new(&self.model, self.memory.render()).with_settings(self.settings.clone());
        if phase == ModelCallPhase::Initial {
            request = request.with_tools(self.tools.render_schema());
        }
        debug!(
            %turn_id,
            %phase,
            provider = self.provider.provider_name(),
            messages = request.messages.len(),
            tools = request.tools.len(),
            "calling model"
        );

        let events = &self.events;
        let reply = async {
            let stream = self.provider.stream_chat(&request).await?;
            StreamAggregator::collect(stream, |text| {
                events.emit(AgentEvent::TextDelta {
                    turn_id,
                    phase,
                    text: text.to_string(),
                });
            })
            .await
        }
        .await;

        reply.map_err(|err| PalaverError::remote_call(phase, err))
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("provider", &self.provider.provider_name())
            .field("model", &self.model)
            .field("tools", &self.tools)
            .field("messages", &self.memory.len())
            .finish()
    }
}
