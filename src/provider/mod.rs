//! Model service boundary: the request shape and the streaming provider trait.

pub mod http;

#[cfg(feature = "openai")]
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::{json, Value};

use crate::error::Result;
use crate::types::{GenerationSettings, StreamFragment};

#[cfg(feature = "openai")]
pub use openai::OpenAiProvider;

/// Stream of reply fragments. An `Err` item means the stream ended abnormally.
pub type FragmentStream = BoxStream<'static, Result<StreamFragment>>;

/// One streamed chat call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    /// Messages already in wire form.
    pub messages: Vec<Value>,
    /// Tool entries in wire form; not sent when empty.
    pub tools: Vec<Value>,
    pub stream: bool,
    pub settings: GenerationSettings,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            stream: true,
            settings: GenerationSettings::default(),
        }
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// JSON body of a chat-completions request.
    pub fn to_body(&self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
            "stream": self.stream,
        });
        if let Some(obj) = body.as_object_mut() {
            if !self.tools.is_empty() {
                obj.insert("tools".into(), Value::Array(self.tools.clone()));
            }
            if let Some(max) = self.settings.max_tokens {
                obj.insert("max_tokens".into(), max.into());
            }
            if let Some(temp) = self.settings.temperature {
                obj.insert("temperature".into(), temp.into());
            }
            if let Some(top_p) = self.settings.top_p {
                obj.insert("top_p".into(), top_p.into());
            }
            if let Some(seed) = self.settings.seed {
                obj.insert("seed".into(), seed.into());
            }
            if let Some(user) = &self.settings.user {
                obj.insert("user".into(), user.clone().into());
            }
        }
        body
    }
}

/// A remote model service that answers a chat request with a fragment stream.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Provider name (e.g. "openai").
    fn provider_name(&self) -> &str;

    /// Open a streamed reply. Errors here mean the call could not be started.
    async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream>;
}

#[async_trait]
impl<P: ChatProvider + ?Sized> ChatProvider for Arc<P> {
    fn provider_name(&self) -> &str {
        (**self).provider_name()
    }

    async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream> {
        (**self).stream_chat(request).await
    }
}
