//! Batch calculators. Each one walks the record slice once and returns a
//! freshly built value object; none of them can fail.

pub mod agent;
pub mod breakdown;
pub mod excerpt;
pub mod summary;
pub mod voice;

pub use agent::{AgentPerformanceCalculator, AgentPerformanceMetrics};
pub use breakdown::{
    breakdown, caller_insights, daily_distribution, duration_by_direction, duration_distribution,
    hourly_distribution, metrics_by_direction, top_inbound_sources, top_outbound_destinations,
    top_sources, CallBreakdown, CallerInsights,
};
pub use excerpt::{CustomerFeedbackExcerpt, FeedbackExcerptExtractor};
pub use summary::{determine_call_direction, summarize, CallDirection, CallSummary, Disposition};
pub use voice::{
    CustomerVoiceAnalyzer, CustomerVoiceSentimentMetrics, SentimentBreakdown, TopicDistribution,
};

/// Rounds to two decimal places. Non-finite input rounds to 0.
pub fn round2(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal place, the precision of the CDR breakdowns.
pub fn round1(value: f64) -> f64 {
    if !value.is_finite() {
        return 0.0;
    }
    (value * 10.0).round() / 10.0
}

/// `100 * part / whole`, or 0 when `whole` is 0.
pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    100.0 * part as f64 / whole as f64
}

/// Arithmetic mean, or 0 for an empty set.
pub fn mean(sum: f64, count: usize) -> f64 {
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
