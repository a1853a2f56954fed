//! Call-detail-record summary: disposition, direction, duration and
//! recording totals for a batch.
//!
//! This is the block the dashboard API hands to the agent calculator as
//! `summary`. Deriving it here lets callers work from raw records alone.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{mean, percent, round2};
use crate::record::{CallRecord, SummaryInput};
use crate::sanitize;

/// Extensions are short all-digit numbers; anything longer is external.
const MAX_EXTENSION_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallDirection {
    Inbound,
    Outbound,
    Internal,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Disposition {
    Answered,
    NoAnswer,
    Busy,
    Failed,
}

impl Disposition {
    /// Parses the PBX disposition strings (`ANSWERED`, `NO ANSWER`, ...).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "ANSWERED" => Some(Disposition::Answered),
            "NO ANSWER" => Some(Disposition::NoAnswer),
            "BUSY" => Some(Disposition::Busy),
            "FAILED" => Some(Disposition::Failed),
            _ => None,
        }
    }
}

fn is_extension(number: &str) -> bool {
    let number = number.trim();
    !number.is_empty()
        && number.chars().count() <= MAX_EXTENSION_LEN
        && number.chars().all(|c| c.is_ascii_digit())
}

/// Classifies a call by which side is an internal extension.
pub fn determine_call_direction(src: Option<&str>, dst: Option<&str>) -> CallDirection {
    let (Some(src), Some(dst)) = (src, dst) else {
        return CallDirection::Unknown;
    };
    if src.is_empty() || dst.is_empty() {
        return CallDirection::Unknown;
    }

    match (is_extension(src), is_extension(dst)) {
        (true, true) => CallDirection::Internal,
        (true, false) => CallDirection::Outbound,
        (false, true) => CallDirection::Inbound,
        (false, false) => CallDirection::Unknown,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSummary {
    pub total_calls: u64,
    pub answered_calls: u64,
    pub no_answer_calls: u64,
    pub busy_calls: u64,
    pub failed_calls: u64,
    pub answer_rate: f64,

    pub total_duration: f64,
    pub avg_duration: f64,
    pub total_billsec: f64,
    pub avg_billsec: f64,

    pub unique_numbers: u64,

    pub inbound_calls: u64,
    pub outbound_calls: u64,
    pub internal_calls: u64,
    pub unknown_direction_calls: u64,
    pub inbound_answer_rate: f64,
    pub outbound_answer_rate: f64,
    pub inbound_avg_duration: f64,
    pub outbound_avg_duration: f64,
    pub internal_avg_duration: f64,

    pub has_recording: u64,
    pub recording_percentage: f64,
}

impl CallSummary {
    /// The subset of the summary consumed by the agent calculator.
    pub fn recording_input(&self) -> SummaryInput {
        SummaryInput::new(self.recording_percentage)
    }
}

#[derive(Default)]
struct DirectionTally {
    calls: usize,
    answered: usize,
    duration: f64,
}

/// Summarizes a record slice. Empty input yields an all-zero summary.
pub fn summarize(records: &[CallRecord]) -> CallSummary {
    if records.is_empty() {
        return CallSummary::default();
    }

    let total = records.len();
    let (mut answered, mut no_answer, mut busy, mut failed) = (0usize, 0usize, 0usize, 0usize);
    let (mut total_duration, mut total_billsec) = (0.0, 0.0);
    let mut recorded = 0usize;
    let mut unique_sources: HashSet<&str> = HashSet::new();
    let mut inbound = DirectionTally::default();
    let mut outbound = DirectionTally::default();
    let mut internal = DirectionTally::default();
    let mut unknown = 0usize;

    for record in records {
        let disposition = record.disposition.as_deref().and_then(Disposition::parse);
        match disposition {
            Some(Disposition::Answered) => answered += 1,
            Some(Disposition::NoAnswer) => no_answer += 1,
            Some(Disposition::Busy) => busy += 1,
            Some(Disposition::Failed) => failed += 1,
            None => {}
        }

        let duration = record.duration.unwrap_or(0.0);
        total_duration += duration;
        total_billsec += record.billsec.unwrap_or(0.0);

        if let Some(src) = record.src.as_deref().filter(|s| !s.is_empty()) {
            unique_sources.insert(src);
        }

        if record.recorded() {
            recorded += 1;
        }

        let direction = determine_call_direction(record.src.as_deref(), record.dst.as_deref());
        let tally = match direction {
            CallDirection::Inbound => &mut inbound,
            CallDirection::Outbound => &mut outbound,
            CallDirection::Internal => &mut internal,
            CallDirection::Unknown => {
                unknown += 1;
                log::trace!(
                    "Unknown call direction: {} -> {}",
                    sanitize::mask_number(record.src.as_deref().unwrap_or_default()),
                    sanitize::mask_number(record.dst.as_deref().unwrap_or_default())
                );
                continue;
            }
        };
        tally.calls += 1;
        tally.duration += duration;
        if disposition == Some(Disposition::Answered) {
            tally.answered += 1;
        }
    }

    CallSummary {
        total_calls: total as u64,
        answered_calls: answered as u64,
        no_answer_calls: no_answer as u64,
        busy_calls: busy as u64,
        failed_calls: failed as u64,
        answer_rate: round2(percent(answered, total)),
        total_duration,
        avg_duration: round2(mean(total_duration, total)),
        total_billsec,
        avg_billsec: round2(mean(total_billsec, total)),
        unique_numbers: unique_sources.len() as u64,
        inbound_calls: inbound.calls as u64,
        outbound_calls: outbound.calls as u64,
        internal_calls: internal.calls as u64,
        unknown_direction_calls: unknown as u64,
        inbound_answer_rate: round2(percent(inbound.answered, inbound.calls)),
        outbound_answer_rate: round2(percent(outbound.answered, outbound.calls)),
        inbound_avg_duration: round2(mean(inbound.duration, inbound.calls)),
        outbound_avg_duration: round2(mean(outbound.duration, outbound.calls)),
        internal_avg_duration: round2(mean(internal.duration, internal.calls)),
        has_recording: recorded as u64,
        recording_percentage: round2(percent(recorded, total)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_direction() {
        let cases = [
            (Some("101"), Some("102"), CallDirection::Internal),
            (Some("101"), Some("0791234567"), CallDirection::Outbound),
            (Some("+41791234567"), Some("200"), CallDirection::Inbound),
            (Some("0791234567"), Some("0441234567"), CallDirection::Unknown),
            (Some(" 101 "), Some("102"), CallDirection::Internal),
            (Some("10a"), Some("102"), CallDirection::Inbound),
            (None, Some("102"), CallDirection::Unknown),
            (Some(""), Some("102"), CallDirection::Unknown),
        ];

        for (src, dst, expected) in cases {
            assert_eq!(
                determine_call_direction(src, dst),
                expected,
                "src={:?} dst={:?}",
                src,
                dst
            );
        }
    }

    #[test]
    fn test_disposition_parse() {
        assert_eq!(Disposition::parse("NO ANSWER"), Some(Disposition::NoAnswer));
        assert_eq!(Disposition::parse("answered"), None);
    }

    #[test]
    fn test_empty_summary() {
        assert_eq!(summarize(&[]), CallSummary::default());
    }

    #[test]
    fn test_summarize() {
        let records: Vec<CallRecord> = serde_json::from_value(json!([
            { "src": "0791234567", "dst": "200", "disposition": "ANSWERED", "duration": 120, "billsec": 100, "recordingfile": "in-1.wav" },
            { "src": "0791234567", "dst": "200", "disposition": "NO ANSWER", "duration": 30, "billsec": 0 },
            { "src": "201", "dst": "0441234567", "disposition": "ANSWERED", "duration": 60, "billsec": 55, "hasRecording": true },
            { "src": "201", "dst": "202", "disposition": "BUSY", "duration": 5 }
        ]))
        .unwrap();

        let summary = summarize(&records);
        assert_eq!(summary.total_calls, 4);
        assert_eq!(summary.answered_calls, 2);
        assert_eq!(summary.no_answer_calls, 1);
        assert_eq!(summary.busy_calls, 1);
        assert_eq!(summary.failed_calls, 0);
        assert_eq!(summary.answer_rate, 50.0);
        assert_eq!(summary.total_duration, 215.0);
        assert_eq!(summary.avg_duration, 53.75);
        assert_eq!(summary.avg_billsec, 38.75);
        assert_eq!(summary.unique_numbers, 2);
        assert_eq!(summary.inbound_calls, 2);
        assert_eq!(summary.outbound_calls, 1);
        assert_eq!(summary.internal_calls, 1);
        assert_eq!(summary.inbound_answer_rate, 50.0);
        assert_eq!(summary.outbound_answer_rate, 100.0);
        assert_eq!(summary.inbound_avg_duration, 75.0);
        assert_eq!(summary.has_recording, 2);
        assert_eq!(summary.recording_percentage, 50.0);
        assert_eq!(summary.recording_input(), SummaryInput::new(50.0));
    }
}
