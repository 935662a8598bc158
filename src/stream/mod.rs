//! Folding a fragment stream into text plus reassembled tool calls.

use std::collections::BTreeMap;

use futures::{Stream, StreamExt};

use crate::error::Result;
use crate::types::{FinishReason, StreamFragment, ToolCallDelta, ToolCallRequest};

/// Everything one streamed reply contained.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregatedReply {
    pub text: String,
    /// Requested calls in ascending slot order.
    pub tool_calls: Vec<ToolCallRequest>,
    pub finish_reason: Option<FinishReason>,
}

impl AggregatedReply {
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Accumulator for a single model call.
#[derive(Debug, Default)]
pub struct StreamAggregator {
    text: String,
    slots: BTreeMap<usize, ToolCallRequest>,
    finish_reason: Option<FinishReason>,
    fragments: usize,
}

impl StreamAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one fragment in. Returns the text delta to surface, if any.
    pub fn push(&mut self, fragment: StreamFragment) -> Option<String> {
        self.fragments += 1;
        for delta in fragment.tool_calls {
            self.push_tool_delta(delta);
        }
        if fragment.finish_reason.is_some() {
            self.finish_reason = fragment.finish_reason;
        }
        match fragment.text {
            Some(text) if !text.is_empty() => {
                self.text.push_str(&text);
                Some(text)
            }
            _ => None,
        }
    }

    fn push_tool_delta(&mut self, delta: ToolCallDelta) {
        let slot = self
            .slots
            .entry(delta.index)
            .or_insert_with(|| ToolCallRequest::new(delta.index, "", "", ""));
        // id and name are taken from the first delta that carries them
        if slot.call_id.is_empty() {
            if let Some(id) = delta.id {
                slot.call_id = id;
            }
        }
        if slot.tool_name.is_empty() {
            if let Some(name) = delta.name {
                slot.tool_name = name;
            }
        }
        if let Some(fragment) = delta.arguments {
            slot.arguments.push_str(&fragment);
        }
    }

    /// Text accumulated so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn finish(self) -> AggregatedReply {
        for slot in self.slots.values() {
            if slot.call_id.is_empty() || slot.tool_name.is_empty() {
                tracing::warn!(
                    slot = slot.slot_index,
                    call_id = %slot.call_id,
                    tool = %slot.tool_name,
                    "tool call finished without an id or name"
                );
            }
        }
        tracing::debug!(
            fragments = self.fragments,
            text_len = self.text.len(),
            tool_calls = self.slots.len(),
            finish_reason = ?self.finish_reason,
            "stream aggregated"
        );
        AggregatedReply {
            text: self.text,
            tool_calls: self.slots.into_values().collect(),
            finish_reason: self.finish_reason,
        }
    }

    /// Drain a fragment stream, calling `on_text` for every text delta as it
    /// arrives. Stops at the first error.
    pub async fn collect<S, F>(stream: S, mut on_text: F) -> Result<AggregatedReply>
    where
        S: Stream<Item = Result<StreamFragment>>,
        F: FnMut(&str),
    {
        let mut stream = std::pin::pin!(stream);
        let mut aggregator = Self::new();
        while let Some(fragment) = stream.next().await {
            if let Some(text) = aggregator.push(fragment?) {
                on_text(&text);
            }
        }
        Ok(aggregator.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PalaverError;
    use pretty_assertions::assert_eq;

    #[test]
    fn text_only_stream_concatenates_in_order() {
        let mut agg = StreamAggregator::new();
        for piece in ["Hel", "", "lo", " world"] {
            agg.push(StreamFragment::text(piece));
        }
        agg.push(StreamFragment::finished(FinishReason::Stop));
        let reply = agg.finish();
        assert_eq!(reply.text, "Hello world");
        assert!(reply.tool_calls.is_empty());
        assert_eq!(reply.finish_reason, Some(FinishReason::Stop));
    }

    #[test]
    fn arguments_are_reassembled_per_slot() {
        let mut agg = StreamAggregator::new();
        agg.push(StreamFragment::tool_call(ToolCallDelta::start(0, "call_a", "add")));
        agg.push(StreamFragment::tool_call(ToolCallDelta::start(1, "call_b", "get_weather")));
        agg.push(StreamFragment {
            tool_calls: vec![
                ToolCallDelta::arguments(0, r#"{"a":2,"#),
                ToolCallDelta::arguments(1, r#"{"city":"#),
            ],
            ..Default::default()
        });
        agg.push(StreamFragment::tool_call(ToolCallDelta::arguments(1, r#""Oslo"}"#)));
        agg.push(StreamFragment::tool_call(ToolCallDelta::arguments(0, r#""b":2"#)));
        agg.push(StreamFragment::tool_call(ToolCallDelta::arguments(0, "}")));

        let reply = agg.finish();
        assert_eq!(
            reply.tool_calls,
            vec![
                ToolCallRequest::new(0, "call_a", "add", r#"{"a":2,"b":2}"#),
                ToolCallRequest::new(1, "call_b", "get_weather", r#"{"city":"Oslo"}"#),
            ]
        );
        assert_eq!(reply.text, "");
    }

    #[test]
    fn rechunking_does_not_change_the_result() {
        let whole = r#"{"city":"Reykjavik","unit":"c"}"#;
        let expected = ToolCallRequest::new(0, "id", "weather", whole);
        for size in 1..=whole.len() {
            let mut agg = StreamAggregator::new();
            agg.push(StreamFragment::tool_call(ToolCallDelta::start(0, "id", "weather")));
            let bytes: Vec<char> = whole.chars().collect();
            for chunk in bytes.chunks(size) {
                let piece: String = chunk.iter().collect();
                agg.push(StreamFragment::tool_call(ToolCallDelta::arguments(0, piece)));
            }
            assert_eq!(agg.finish().tool_calls, vec![expected.clone()]);
        }
    }

    #[test]
    fn late_identity_fields_do_not_overwrite() {
        let mut agg = StreamAggregator::new();
        agg.push(StreamFragment::tool_call(ToolCallDelta {
            index: 0,
            id: Some("first".into()),
            name: Some("add".into()),
            arguments: Some("{".into()),
        }));
        agg.push(StreamFragment::tool_call(ToolCallDelta {
            index: 0,
            id: Some("second".into()),
            name: None,
            arguments: Some("}".into()),
        }));
        let reply = agg.finish();
        assert_eq!(reply.tool_calls[0].call_id, "first");
        assert_eq!(reply.tool_calls[0].arguments, "{}");
    }

    #[test]
    fn slots_come_back_in_ascending_order() {
        let mut agg = StreamAggregator::new();
        agg.push(StreamFragment::tool_call(ToolCallDelta::start(2, "c", "t")));
        agg.push(StreamFragment::tool_call(ToolCallDelta::start(0, "a", "t")));
        let slots: Vec<_> = agg.finish().tool_calls.iter().map(|c| c.slot_index).collect();
        assert_eq!(slots, vec![0, 2]);
    }

    #[tokio::test]
    async fn collect_surfaces_text_incrementally() {
        let fragments = vec![
            Ok(StreamFragment::text("a")),
            Ok(StreamFragment::text("b")),
            Ok(StreamFragment::finished(FinishReason::Stop)),
        ];
        let mut seen = Vec::new();
        let reply = StreamAggregator::collect(futures::stream::iter(fragments), |t| {
            seen.push(t.to_string())
        })
        .await
        .unwrap();
        assert_eq!(seen, vec!["a", "b"]);
        assert_eq!(reply.text, "ab");
    }

    #[tokio::test]
    async fn collect_stops_at_first_error() {
        let fragments = vec![
            Ok(StreamFragment::text("partial")),
            Err(PalaverError::Stream("connection reset".into())),
            Ok(StreamFragment::text("never")),
        ];
        let err = StreamAggregator::collect(futures::stream::iter(fragments), |_| {})
            .await
            .unwrap_err();
        assert!(matches!(err, PalaverError::Stream(_)));
    }
}
