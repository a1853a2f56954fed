//! Builder patterns for creating call records programmatically.
//!
//! Records are built through their JSON form so tests exercise the same
//! lenient deserialization path as production input.

#![allow(dead_code)]

use serde_json::{json, Map, Value};

use callsight::CallRecord;

/// A transcript comfortably above the excerpt length threshold.
pub const LONG_TRANSCRIPT: &str =
    "Hi, I am calling because my last invoice shows a charge I do not recognise and I would like it explained.";

/// Builder for creating `CallRecord` instances.
pub struct CallRecordBuilder {
    fields: Map<String, Value>,
}

impl CallRecordBuilder {
    /// Create an empty record (no signals, no numbers).
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Create a record with the given natural key.
    pub fn with_id(id: &str) -> Self {
        Self::new().field("id", json!(id))
    }

    /// Set an arbitrary JSON field, bypassing the typed setters.
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn recording_file(self, file: &str) -> Self {
        self.field("recordingfile", json!(file))
    }

    pub fn has_recording(self, has: bool) -> Self {
        self.field("hasRecording", json!(has))
    }

    pub fn transcript(self, text: &str) -> Self {
        self.field("transcriptionText", json!(text))
    }

    pub fn speakers(self, count: u64) -> Self {
        self.field("speakersCount", json!(count))
    }

    pub fn words(self, count: u64) -> Self {
        self.field("wordsCount", json!(count))
    }

    pub fn duration_seconds(self, seconds: f64) -> Self {
        self.field("audioDurationSeconds", json!(seconds))
    }

    /// Set `callCompletion.status` (`COMPLETE`, `INCOMPLETE`, `UNKNOWN`).
    pub fn completion(self, status: &str) -> Self {
        self.field(
            "callCompletion",
            json!({ "status": status, "explanation": "test fixture" }),
        )
    }

    pub fn complete(self) -> Self {
        self.completion("COMPLETE")
    }

    pub fn custom_topic(self, topic: &str) -> Self {
        self.field("customTopic", json!(topic))
    }

    pub fn topic_summary(self, summary: &str) -> Self {
        self.field("topicDetectionSummary", json!(summary))
    }

    /// Set per-utterance sentiment tags.
    pub fn utterances(self, tags: &[&str]) -> Self {
        let items: Vec<Value> = tags.iter().map(|t| json!({ "sentiment": t })).collect();
        self.field("sentimentAnalysis", Value::Array(items))
    }

    pub fn lemur_sentiment(self, sentiment: &str) -> Self {
        self.field(
            "lemurAnalysis",
            json!({ "sentimentAnalysis": { "customerSentiment": sentiment } }),
        )
    }

    pub fn two_party(self, value: Value) -> Self {
        self.field("twoPartySentiment", value)
    }

    pub fn created_at(self, timestamp: &str) -> Self {
        self.field("createdAt", json!(timestamp))
    }

    /// Set call detail record fields.
    pub fn cdr(self, src: &str, dst: &str, disposition: &str, duration: u64) -> Self {
        self.field("src", json!(src))
            .field("dst", json!(dst))
            .field("disposition", json!(disposition))
            .field("duration", json!(duration))
            .field("billsec", json!(duration))
    }

    /// The record as raw JSON.
    pub fn to_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }

    /// Build the final CallRecord.
    pub fn build(self) -> CallRecord {
        serde_json::from_value(Value::Object(self.fields)).expect("builder produced valid record")
    }
}

impl Default for CallRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds `n` identical records from a template closure.
pub fn repeat_records<F>(n: usize, template: F) -> Vec<CallRecord>
where
    F: Fn(usize) -> CallRecordBuilder,
{
    (0..n).map(|i| template(i).build()).collect()
}
