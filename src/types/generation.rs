//! Generation settings and related enums.

use bon::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Optional sampling controls forwarded to the model service.
#[derive(Debug, Clone, Builder, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct GenerationSettings {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
    pub seed: Option<u64>,
    pub user: Option<String>,
}

impl GenerationSettings {
    /// Overlay every field set in `other` onto `self`.
    pub fn merge(mut self, other: &GenerationSettings) -> Self {
        if other.max_tokens.is_some() {
            self.max_tokens = other.max_tokens;
        }
        if other.temperature.is_some() {
            self.temperature = other.temperature;
        }
        if other.top_p.is_some() {
            self.top_p = other.top_p;
        }
        if other.seed.is_some() {
            self.seed = other.seed;
        }
        if other.user.is_some() {
            self.user.clone_from(&other.user);
        }
        self
    }
}

/// Why generation finished.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ToolCalls,
    ContentFilter,
    Error,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_keeps_unset_fields() {
        let base = GenerationSettings::builder()
            .temperature(0.2)
            .max_tokens(256)
            .build();
        let overlay = GenerationSettings::builder().temperature(0.9).build();
        let merged = base.merge(&overlay);
        assert_eq!(merged.temperature, Some(0.9));
        assert_eq!(merged.max_tokens, Some(256));
        assert_eq!(merged.seed, None);
    }

    #[test]
    fn finish_reason_parses_wire_names() {
        assert_eq!("tool_calls".parse::<FinishReason>().ok(), Some(FinishReason::ToolCalls));
        assert_eq!(FinishReason::ContentFilter.to_string(), "content_filter");
    }
}
