use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::record::CallRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    /// Fixed score contributed to the average sentiment score.
    pub fn score(self) -> f64 {
        match self {
            Sentiment::Positive => 0.8,
            Sentiment::Neutral => 0.5,
            Sentiment::Negative => 0.2,
        }
    }

    /// Parses an exact tag (`POSITIVE`, `neutral`, ...).
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Some(Sentiment::Positive),
            "NEUTRAL" => Some(Sentiment::Neutral),
            "NEGATIVE" => Some(Sentiment::Negative),
            _ => None,
        }
    }

    fn scored(self) -> (Sentiment, f64) {
        (self, self.score())
    }
}

/// One tier of the sentiment fallback chain.
pub type SentimentSource = fn(&CallRecord) -> Option<(Sentiment, f64)>;

/// Sentiment sources in priority order; the first `Some` wins.
pub const SENTIMENT_SOURCES: [(&str, SentimentSource); 3] = [
    ("utterances", from_utterances),
    ("lemur", from_lemur),
    ("two_party", from_two_party),
];

const POSITIVE_WORDS: &[&str] = &["positive", "satisfied", "happy"];
const NEGATIVE_WORDS: &[&str] = &["negative", "frustrated", "angry"];

const EXCERPT_POSITIVE_WORDS: &[&str] = &["positive", "satisfied"];
const EXCERPT_NEGATIVE_WORDS: &[&str] = &["negative", "frustrated"];

/// Runs the fallback chain. `None` means the record carries no usable
/// sentiment signal.
pub fn classify_record(record: &CallRecord) -> Option<(Sentiment, f64)> {
    SENTIMENT_SOURCES
        .iter()
        .find_map(|(_, source)| source(record))
}

/// Majority vote over per-utterance tags. Neutral wins unless positive or
/// negative strictly outnumbers both other classes.
pub fn majority<I>(tags: I) -> Sentiment
where
    I: IntoIterator<Item = Sentiment>,
{
    let (mut positive, mut neutral, mut negative) = (0usize, 0usize, 0usize);
    for tag in tags {
        match tag {
            Sentiment::Positive => positive += 1,
            Sentiment::Neutral => neutral += 1,
            Sentiment::Negative => negative += 1,
        }
    }

    if positive > neutral && positive > negative {
        Sentiment::Positive
    } else if negative > neutral && negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn from_utterances(record: &CallRecord) -> Option<(Sentiment, f64)> {
    let tags: Vec<Sentiment> = record
        .utterance_sentiments()?
        .iter()
        .filter_map(|u| u.sentiment.as_deref().and_then(Sentiment::from_tag))
        .collect();

    if tags.is_empty() {
        return None;
    }
    Some(majority(tags).scored())
}

pub fn from_lemur(record: &CallRecord) -> Option<(Sentiment, f64)> {
    let raw = record.lemur_customer_sentiment()?;
    let sentiment = match raw.trim().to_ascii_uppercase().as_str() {
        "POSITIVE" => Sentiment::Positive,
        "NEGATIVE" => Sentiment::Negative,
        _ => Sentiment::Neutral,
    };
    Some(sentiment.scored())
}

pub fn from_two_party(record: &CallRecord) -> Option<(Sentiment, f64)> {
    let value = record.two_party_sentiment()?;

    let customer = value
        .as_object()
        .and_then(|map| map.get("customerSentiment"))
        .filter(|v| !v.is_null() && v.as_str().map_or(true, |s| !s.trim().is_empty()));

    if let Some(customer) = customer {
        let text = stringify(customer);
        let sentiment = if text.contains("positive") {
            Sentiment::Positive
        } else if text.contains("negative") {
            Sentiment::Negative
        } else {
            Sentiment::Neutral
        };
        return Some(sentiment.scored());
    }

    Some(match_words(&stringify(value), POSITIVE_WORDS, NEGATIVE_WORDS).scored())
}

/// Simplified classifier for feedback excerpts: looks only at the legacy
/// two-party sentiment, stringified, and defaults to neutral.
pub fn classify_excerpt(record: &CallRecord) -> Sentiment {
    match record.two_party_sentiment() {
        Some(value) => match_words(
            &stringify(value),
            EXCERPT_POSITIVE_WORDS,
            EXCERPT_NEGATIVE_WORDS,
        ),
        None => Sentiment::Neutral,
    }
}

/// Lowercased text form of a loosely typed value. Strings are used as-is,
/// everything else is serialized to JSON.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string().to_lowercase(),
    }
}

fn match_words(text: &str, positive: &[&str], negative: &[&str]) -> Sentiment {
    if positive.iter().any(|w| text.contains(w)) {
        Sentiment::Positive
    } else if negative.iter().any(|w| text.contains(w)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}
