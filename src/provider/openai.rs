//! OpenAI-compatible Chat Completions provider (streaming only).

use std::time::Duration;

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::config::AgentConfig;
use crate::error::{PalaverError, Result};
use crate::types::{FinishReason, StreamFragment, ToolCallDelta};
use crate::util::RetryPolicy;

use super::http::{
    bearer_headers, decode_line_bytes, next_line, parse_sse_line, shared_client, status_to_error,
    SseLine,
};
use super::{ChatProvider, ChatRequest, FragmentStream};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub struct OpenAiProvider {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
    retry: RetryPolicy,
}

impl OpenAiProvider {
    pub fn new(api_key: impl Into<String>, base_url: Option<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            client: shared_client().clone(),
            retry: RetryPolicy::default(),
        }
    }

    /// Build from resolved configuration. Fails when no API key is set.
    pub fn from_config(config: &AgentConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| PalaverError::Authentication("Missing OPENAI_API_KEY".into()))?;
        let client =
            super::http::client_with_connect_timeout(Duration::from_secs(config.connect_timeout_secs))?;
        Ok(Self::new(api_key, config.base_url.clone())
            .with_client(client)
            .with_retry_policy(RetryPolicy::default().with_max_attempts(config.max_retries.max(1))))
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn open(&self, url: &str, body: &serde_json::Value) -> Result<reqwest::Response> {
        let resp = self
            .client
            .post(url)
            .headers(bearer_headers(&self.api_key))
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let retry_after = resp
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            let body_text = resp.text().await.unwrap_or_default();
            return Err(status_to_error(status.as_u16(), &body_text, retry_after.as_deref()));
        }
        Ok(resp)
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    async fn stream_chat(&self, request: &ChatRequest) -> Result<FragmentStream> {
        let body = request.to_body();
        let url = format!("{}/chat/completions", self.base_url);
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            tools = request.tools.len(),
            "OpenAI stream_chat"
        );

        let (url_ref, body_ref) = (url.as_str(), &body);
        let resp = self.retry.execute(move || self.open(url_ref, body_ref)).await?;
        let byte_stream = resp.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer: Vec<u8> = Vec::new();
            let mut finished = false;
            let mut done = false;
            let mut failed = false;
            futures::pin_mut!(byte_stream);

            'read: while let Some(chunk_result) = byte_stream.next().await {
                let chunk = match chunk_result {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(PalaverError::Network(e));
                        failed = true;
                        break 'read;
                    }
                };
                buffer.extend_from_slice(&chunk);

                while let Some(line) = next_line(&mut buffer) {
                    match line.map_or_else(Decoded::Failed, |line| decode_line(&line)) {
                        Decoded::Skip => {}
                        Decoded::Done => {
                            done = true;
                            break 'read;
                        }
                        Decoded::Fragment { fragment, finish } => {
                            finished |= finish;
                            if !fragment.is_empty() {
                                yield Ok(fragment);
                            }
                        }
                        Decoded::Failed(e) => {
                            yield Err(e);
                            failed = true;
                            break 'read;
                        }
                    }
                }
            }

            // a final line may arrive without its newline
            if !failed && !done {
                let rest = decode_line_bytes(std::mem::take(&mut buffer));
                match rest.map_or_else(Decoded::Failed, |line| decode_line(&line)) {
                    Decoded::Skip => {}
                    Decoded::Done => done = true,
                    Decoded::Fragment { fragment, finish } => {
                        finished |= finish;
                        if !fragment.is_empty() {
                            yield Ok(fragment);
                        }
                    }
                    Decoded::Failed(e) => {
                        yield Err(e);
                        failed = true;
                    }
                }
            }

            if !failed && !done && !finished {
                yield Err(PalaverError::Stream(
                    "stream closed before the reply was complete".into(),
                ));
            }
        };

        Ok(Box::pin(stream))
    }
}

enum Decoded {
    Skip,
    Done,
    Fragment { fragment: StreamFragment, finish: bool },
    Failed(PalaverError),
}

fn decode_line(line: &str) -> Decoded {
    match parse_sse_line(line) {
        SseLine::Ignored => Decoded::Skip,
        SseLine::Done => Decoded::Done,
        SseLine::Data(data) => match parse_chunk(data) {
            Ok((fragment, finish)) => Decoded::Fragment { fragment, finish },
            Err(e) => Decoded::Failed(e),
        },
    }
}

/// Decode one SSE data payload. The flag reports whether a finish reason was present.
fn parse_chunk(data: &str) -> Result<(StreamFragment, bool)> {
    let chunk: OpenAiStreamChunk = serde_json::from_str(data)?;
    if let Some(error) = chunk.error {
        return Err(PalaverError::Stream(format!(
            "provider reported an error: {}",
            error.message
        )));
    }

    let Some(choice) = chunk.choices.into_iter().next() else {
        return Ok((StreamFragment::default(), false));
    };
    let saw_finish = choice.finish_reason.is_some();
    let tool_calls = choice
        .delta
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|tc| {
            let (name, arguments) = match tc.function {
                Some(f) => (f.name, f.arguments),
                None => (None, None),
            };
            ToolCallDelta {
                index: tc.index,
                id: tc.id,
                name,
                arguments,
            }
        })
        .collect();

    let fragment = StreamFragment {
        text: choice.delta.content,
        tool_calls,
        finish_reason: choice
            .finish_reason
            .as_deref()
            .and_then(|s| s.parse::<FinishReason>().ok()),
    };
    Ok((fragment, saw_finish))
}

// OpenAI API stream types (internal)

#[derive(Deserialize)]
struct OpenAiStreamChunk {
    #[serde(default)]
    choices: Vec<OpenAiStreamChoice>,
    error: Option<OpenAiErrorBody>,
}

#[derive(Deserialize)]
struct OpenAiErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct OpenAiStreamChoice {
    #[serde(default)]
    delta: OpenAiStreamDelta,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
struct OpenAiStreamDelta {
    content: Option<String>,
    tool_calls: Option<Vec<OpenAiStreamToolCall>>,
}

#[derive(Deserialize)]
struct OpenAiStreamToolCall {
    index: usize,
    id: Option<String>,
    function: Option<OpenAiStreamFunction>,
}

#[derive(Deserialize)]
struct OpenAiStreamFunction {
    name: Option<String>,
    arguments: Option<String>,
}
