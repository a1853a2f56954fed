pub mod batch;
pub mod lenient;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use batch::{parse_records, CallBatch, DateRange, SummaryInput};

/// One processed call or recording, as delivered by the upstream API.
///
/// Every field is optional and deserialized leniently: a wrongly typed
/// field reads as absent rather than rejecting the record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallRecord {
    #[serde(deserialize_with = "lenient::string")]
    pub id: Option<String>,
    #[serde(rename = "recordingfile", deserialize_with = "lenient::string")]
    pub recording_file: Option<String>,
    #[serde(deserialize_with = "lenient::flag")]
    pub has_recording: bool,
    #[serde(deserialize_with = "lenient::string")]
    pub upload_status: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub status: Option<String>,

    #[serde(deserialize_with = "lenient::string")]
    pub transcription_text: Option<String>,
    #[serde(deserialize_with = "lenient::amount")]
    pub speakers_count: Option<f64>,
    #[serde(deserialize_with = "lenient::count")]
    pub words_count: Option<u64>,
    #[serde(deserialize_with = "lenient::seconds")]
    pub audio_duration_seconds: Option<f64>,
    #[serde(deserialize_with = "lenient::nested")]
    pub call_completion: Option<CallCompletion>,

    #[serde(deserialize_with = "lenient::string")]
    pub custom_topic: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub topic_detection_summary: Option<String>,
    #[serde(deserialize_with = "lenient::list")]
    pub sentiment_analysis: Option<Vec<UtteranceSentiment>>,
    #[serde(deserialize_with = "lenient::nested")]
    pub lemur_analysis: Option<LemurAnalysis>,
    #[serde(deserialize_with = "lenient::any")]
    pub two_party_sentiment: Option<Value>,

    #[serde(deserialize_with = "lenient::timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    /// PBX call start time, when the record carries its CDR row.
    #[serde(deserialize_with = "lenient::timestamp")]
    pub calldate: Option<DateTime<Utc>>,

    // Call detail record fields used by the summary calculator.
    #[serde(deserialize_with = "lenient::string")]
    pub src: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub dst: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub disposition: Option<String>,
    #[serde(deserialize_with = "lenient::seconds")]
    pub duration: Option<f64>,
    #[serde(deserialize_with = "lenient::seconds")]
    pub billsec: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CallCompletion {
    pub status: CompletionStatus,
    #[serde(deserialize_with = "lenient::string")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CompletionStatus {
    Complete,
    Incomplete,
    #[default]
    Unknown,
}

impl CompletionStatus {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "COMPLETE" => CompletionStatus::Complete,
            "INCOMPLETE" => CompletionStatus::Incomplete,
            _ => CompletionStatus::Unknown,
        }
    }
}

impl<'de> Deserialize<'de> for CompletionStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value
            .as_str()
            .map(CompletionStatus::parse)
            .unwrap_or_default())
    }
}

/// One per-utterance sentiment tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtteranceSentiment {
    #[serde(deserialize_with = "lenient::string")]
    pub sentiment: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub speaker: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LemurAnalysis {
    #[serde(deserialize_with = "lenient::nested")]
    pub sentiment_analysis: Option<LemurSentiment>,
    #[serde(deserialize_with = "lenient::string")]
    pub topic: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LemurSentiment {
    #[serde(deserialize_with = "lenient::string")]
    pub customer_sentiment: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.trim().is_empty())
}

impl CallRecord {
    /// Natural key used to de-duplicate excerpts within one extraction.
    pub fn natural_key(&self) -> Option<&str> {
        non_blank(&self.id).or_else(|| non_blank(&self.recording_file))
    }

    /// Transcript text, if the call was transcribed.
    pub fn transcript(&self) -> Option<&str> {
        non_blank(&self.transcription_text)
    }

    pub fn completion_status(&self) -> CompletionStatus {
        self.call_completion
            .as_ref()
            .map(|c| c.status)
            .unwrap_or_default()
    }

    pub fn is_complete(&self) -> bool {
        self.completion_status() == CompletionStatus::Complete
    }

    pub fn is_multi_speaker(&self) -> bool {
        self.speakers_count.unwrap_or(0.0) > 1.0
    }

    /// When the call happened: the CDR `calldate`, else the upload time.
    pub fn call_time(&self) -> Option<DateTime<Utc>> {
        self.calldate.or(self.created_at)
    }

    pub fn audio_seconds(&self) -> f64 {
        self.audio_duration_seconds.unwrap_or(0.0)
    }

    pub fn word_count(&self) -> u64 {
        self.words_count.unwrap_or(0)
    }

    pub fn custom_topic(&self) -> Option<&str> {
        non_blank(&self.custom_topic)
    }

    pub fn lemur_topic(&self) -> Option<&str> {
        self.lemur_analysis.as_ref().and_then(|l| non_blank(&l.topic))
    }

    pub fn topic_summary(&self) -> Option<&str> {
        non_blank(&self.topic_detection_summary)
    }

    /// Per-utterance sentiment tags; an empty array counts as absent.
    pub fn utterance_sentiments(&self) -> Option<&[UtteranceSentiment]> {
        self.sentiment_analysis
            .as_deref()
            .filter(|tags| !tags.is_empty())
    }

    pub fn lemur_customer_sentiment(&self) -> Option<&str> {
        self.lemur_analysis
            .as_ref()
            .and_then(|l| l.sentiment_analysis.as_ref())
            .and_then(|s| non_blank(&s.customer_sentiment))
    }

    /// Legacy two-party sentiment; blank strings count as absent.
    pub fn two_party_sentiment(&self) -> Option<&Value> {
        self.two_party_sentiment
            .as_ref()
            .filter(|v| !matches!(v, Value::String(s) if s.trim().is_empty()))
    }

    /// True when the record carries at least one topic or sentiment signal.
    pub fn has_voice_signal(&self) -> bool {
        self.custom_topic().is_some()
            || self.two_party_sentiment().is_some()
            || self.topic_summary().is_some()
            || self.utterance_sentiments().is_some()
            || self.lemur_analysis.is_some()
    }

    /// A recording exists when flagged upstream or a recording file is named.
    pub fn recorded(&self) -> bool {
        self.has_recording || non_blank(&self.recording_file).is_some()
    }
}
