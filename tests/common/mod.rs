//! Shared test helpers and a scripted provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream;

use palaver::agent::{AgentEvent, EventSink};
use palaver::error::{PalaverError, Result};
use palaver::provider::{ChatProvider, ChatRequest, FragmentStream};
use palaver::types::{FinishReason, StreamFragment, ToolCallDelta};

/// One canned reaction to a `stream_chat` call.
pub enum Script {
    Reply(Vec<StreamFragment>),
    /// The call cannot be opened (e.g. HTTP status error).
    OpenFailure { status: u16, message: String },
    /// The stream yields these fragments, then breaks.
    BrokenStream(Vec<StreamFragment>),
}

/// A provider that replays scripts in order and records every request.
#[derive(Default)]
pub struct ScriptedProvider {
    scripts: Mutex<VecDeque<Script>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, script: Script) {
        self.scripts.lock().unwrap().push_back(script);
    }

    pub fn push_reply(&self, fragments: Vec<StreamFragment>) {
        self.push(Script::Reply(fragments));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatProvider for ScriptedProvider {
    fn provider_name(&self) -> &str {
        "scripted"
    }

    async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream> {
        self.requests.lock().unwrap().push(request.clone());
        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PalaverError::Stream("no scripted reply left".into()))?;
        match script {
            Script::Reply(fragments) => Ok(Box::pin(stream::iter(fragments.into_iter().map(Ok)))),
            Script::OpenFailure { status, message } => Err(PalaverError::api(status, message)),
            Script::BrokenStream(fragments) => {
                let items = fragments
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(PalaverError::Stream(
                        "connection reset".into(),
                    ))));
                Ok(Box::pin(stream::iter(items)))
            }
        }
    }
}

/// A text reply split into the given pieces.
pub fn text_reply(pieces: &[&str]) -> Vec<StreamFragment> {
    let mut fragments: Vec<_> = pieces.iter().map(|p| StreamFragment::text(*p)).collect();
    fragments.push(StreamFragment::finished(FinishReason::Stop));
    fragments
}

/// A single tool call on slot 0 whose argument text arrives in `arg_pieces`.
pub fn tool_call_reply(id: &str, name: &str, arg_pieces: &[&str]) -> Vec<StreamFragment> {
    let mut fragments = vec![StreamFragment::tool_call(ToolCallDelta::start(0, id, name))];
    fragments.extend(
        arg_pieces
            .iter()
            .map(|p| StreamFragment::tool_call(ToolCallDelta::arguments(0, *p))),
    );
    fragments.push(StreamFragment::finished(FinishReason::ToolCalls));
    fragments
}

/// An event sink that records every event.
pub fn recording_sink() -> (EventSink, Arc<Mutex<Vec<AgentEvent>>>) {
    let events = Arc::new(Mutex::new(Vec::new()));
    let captured = Arc::clone(&events);
    let sink: EventSink = Arc::new(move |event| captured.lock().unwrap().push(event));
    (sink, events)
}
