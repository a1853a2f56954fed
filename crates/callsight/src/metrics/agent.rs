use serde::{Deserialize, Serialize};

use super::{mean, percent, round2};
use crate::record::{CallRecord, SummaryInput};

/// Efficiency is capped at a realistic benchmark rather than 100%.
const EFFICIENCY_CAP: f64 = 95.0;

const SATISFACTION_BASE: f64 = 3.5;
const SATISFACTION_SPAN: f64 = 1.5;
const SATISFACTION_MAX: f64 = 5.0;

const ACCURACY_BASE: f64 = 85.0;
const ACCURACY_WEIGHT: f64 = 0.1;
const ACCURACY_CAP: f64 = 98.0;

const AUDIO_BASE: f64 = 80.0;
const AUDIO_WEIGHT: f64 = 0.15;
const AUDIO_CAP: f64 = 95.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentPerformanceMetrics {
    /// Share of calls whose completion status is COMPLETE (0–100).
    pub call_completion_rate: f64,
    /// Mean audio duration in minutes, over calls with audio.
    pub average_handle_time: f64,
    /// Share of transcribed calls, capped at 95.
    pub agent_efficiency: f64,
    /// Satisfaction estimate on a 0–5 scale.
    pub customer_satisfaction: f64,
    pub total_calls_processed: u64,
    pub average_word_count: f64,
    pub multi_speaker_calls_percentage: f64,
    pub recording_success_rate: f64,
    /// Heuristic proxy derived from speech rate; not a measured accuracy.
    pub transcription_accuracy: f64,
    pub audio_quality_score: f64,
}

#[derive(Default)]
struct Tally {
    completed: usize,
    transcribed: usize,
    multi_speaker: usize,
    timed: usize,
    duration_seconds: f64,
    worded: usize,
    words: f64,
}

impl Tally {
    fn add(&mut self, record: &CallRecord) {
        if record.is_complete() {
            self.completed += 1;
        }
        if record.transcript().is_some() {
            self.transcribed += 1;
        }
        if record.is_multi_speaker() {
            self.multi_speaker += 1;
        }
        let seconds = record.audio_seconds();
        if seconds > 0.0 {
            self.timed += 1;
            self.duration_seconds += seconds;
        }
        let words = record.word_count();
        if words > 0 {
            self.worded += 1;
            self.words += words as f64;
        }
    }
}

/// Derives agent KPIs from a record slice and the upstream summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct AgentPerformanceCalculator;

impl AgentPerformanceCalculator {
    pub fn new() -> Self {
        Self
    }

    pub fn compute(&self, records: &[CallRecord], summary: &SummaryInput) -> AgentPerformanceMetrics {
        if records.is_empty() {
            return AgentPerformanceMetrics::default();
        }

        let total = records.len();
        let mut tally = Tally::default();
        for record in records {
            tally.add(record);
        }

        let average_handle_time = mean(tally.duration_seconds, tally.timed) / 60.0;
        let average_word_count = mean(tally.words, tally.worded);

        // Multi-speaker calls are counted over all records but divided by
        // completed calls; the clamp keeps the result on the 0–5 scale.
        let customer_satisfaction = if tally.completed > 0 {
            let ratio = tally.multi_speaker as f64 / tally.completed as f64;
            SATISFACTION_MAX.min(SATISFACTION_BASE + SATISFACTION_SPAN * ratio)
        } else {
            0.0
        };

        let transcription_accuracy = if tally.transcribed > 0 {
            let words_per_minute = if average_handle_time > 0.0 {
                average_word_count / average_handle_time
            } else {
                0.0
            };
            ACCURACY_CAP.min(ACCURACY_BASE + ACCURACY_WEIGHT * words_per_minute)
        } else {
            0.0
        };

        let recording_success_rate = if summary.recording_percentage.is_finite() {
            summary.recording_percentage
        } else {
            0.0
        };

        let audio_quality_score = if recording_success_rate > 0.0 {
            AUDIO_CAP.min(AUDIO_BASE + AUDIO_WEIGHT * recording_success_rate)
        } else {
            0.0
        };

        let metrics = AgentPerformanceMetrics {
            call_completion_rate: round2(percent(tally.completed, total)),
            average_handle_time: round2(average_handle_time),
            agent_efficiency: round2(EFFICIENCY_CAP.min(percent(tally.transcribed, total))),
            customer_satisfaction: round2(customer_satisfaction),
            total_calls_processed: total as u64,
            average_word_count: average_word_count.round(),
            multi_speaker_calls_percentage: round2(percent(tally.multi_speaker, total)),
            recording_success_rate: round2(recording_success_rate),
            transcription_accuracy: round2(transcription_accuracy),
            audio_quality_score: round2(audio_quality_score),
        };

        tracing::debug!(
            total,
            completed = tally.completed,
            transcribed = tally.transcribed,
            multi_speaker = tally.multi_speaker,
            "Computed agent performance"
        );

        metrics
    }
}
