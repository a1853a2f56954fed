use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::{classify_excerpt, Sentiment, TopicCategorizer};
use crate::config::ExcerptConfig;
use crate::record::CallRecord;
use crate::sanitize;

const ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerFeedbackExcerpt {
    pub id: String,
    pub text: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub sentiment: Sentiment,
    pub topic: String,
    pub duration_seconds: f64,
    pub word_count: u64,
}

/// Picks the first N sufficiently long transcripts, in input order.
///
/// This is a sample, not a ranking. Sentiment comes from the legacy
/// two-party field only (see [`classify_excerpt`]).
#[derive(Debug, Clone)]
pub struct FeedbackExcerptExtractor {
    config: ExcerptConfig,
    categorizer: TopicCategorizer,
}

impl Default for FeedbackExcerptExtractor {
    fn default() -> Self {
        Self::new(ExcerptConfig::default())
    }
}

impl FeedbackExcerptExtractor {
    /// Limits above the dashboard maximums are clamped.
    pub fn new(config: ExcerptConfig) -> Self {
        Self {
            config: config.clamped(),
            categorizer: TopicCategorizer::for_excerpts(),
        }
    }

    pub fn config(&self) -> &ExcerptConfig {
        &self.config
    }

    pub fn extract(&self, records: &[CallRecord]) -> Vec<CustomerFeedbackExcerpt> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut excerpts = Vec::with_capacity(self.config.limit.min(records.len()));

        for (index, record) in records.iter().enumerate() {
            if excerpts.len() >= self.config.limit {
                break;
            }

            let Some(text) = record.transcript() else {
                continue;
            };
            if text.chars().count() <= self.config.min_transcript_chars {
                continue;
            }

            if let Some(key) = record.natural_key() {
                if !seen.insert(key) {
                    tracing::debug!(record = %sanitize::hash_id(key), "Skipping duplicate excerpt");
                    continue;
                }
            }

            excerpts.push(self.build(index, record, text));
        }

        excerpts
    }

    fn build(&self, index: usize, record: &CallRecord, text: &str) -> CustomerFeedbackExcerpt {
        let id = record
            .natural_key()
            .map(str::to_string)
            .unwrap_or_else(|| format!("excerpt-{}", index));

        let topic = match record.custom_topic() {
            Some(custom) => custom.to_string(),
            None => {
                let summary = record.topic_summary().unwrap_or_default();
                self.categorizer.categorize(summary).label().to_string()
            }
        };

        CustomerFeedbackExcerpt {
            id,
            text: truncate(text, self.config.max_text_chars),
            timestamp: record.created_at,
            sentiment: classify_excerpt(record),
            topic,
            duration_seconds: record.audio_seconds(),
            word_count: record.word_count(),
        }
    }
}

/// Cuts `text` to `max_chars` characters and appends an ellipsis when
/// anything was removed.
pub fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => {
            let mut cut = text[..byte_index].to_string();
            cut.push(ELLIPSIS);
            cut
        }
        None => text.to_string(),
    }
}
