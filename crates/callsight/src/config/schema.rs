use serde::{Deserialize, Serialize};

use crate::classify::topic::{default_topic_rules, Topic};

pub const CONFIG_VERSION: &str = "1.0";

/// Upper bound on `excerpts.limit`; the dashboard never shows more.
pub const MAX_EXCERPT_LIMIT: usize = 10;
/// Upper bound on `excerpts.maxTextChars`.
pub const MAX_EXCERPT_TEXT_CHARS: usize = 200;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    pub version: String,
    /// Topic keyword table, evaluated top to bottom.
    #[serde(default = "default_topic_rules")]
    pub topics: Vec<TopicRule>,
    #[serde(default)]
    pub excerpts: ExcerptConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION.to_string(),
            topics: default_topic_rules(),
            excerpts: ExcerptConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRule {
    pub topic: Topic,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExcerptConfig {
    /// Maximum number of excerpts returned.
    #[serde(default = "default_excerpt_limit")]
    pub limit: usize,
    /// Transcripts must be strictly longer than this to qualify.
    #[serde(default = "default_min_transcript_chars")]
    pub min_transcript_chars: usize,
    /// Excerpt text is cut to this many characters before the ellipsis.
    #[serde(default = "default_max_text_chars")]
    pub max_text_chars: usize,
}

fn default_excerpt_limit() -> usize {
    MAX_EXCERPT_LIMIT
}

fn default_min_transcript_chars() -> usize {
    50
}

fn default_max_text_chars() -> usize {
    MAX_EXCERPT_TEXT_CHARS
}

impl ExcerptConfig {
    /// Returns a copy with `limit` and `max_text_chars` held within their
    /// upper bounds.
    pub fn clamped(self) -> Self {
        Self {
            limit: self.limit.min(MAX_EXCERPT_LIMIT),
            max_text_chars: self.max_text_chars.min(MAX_EXCERPT_TEXT_CHARS),
            ..self
        }
    }
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self {
            limit: default_excerpt_limit(),
            min_transcript_chars: default_min_transcript_chars(),
            max_text_chars: default_max_text_chars(),
        }
    }
}
