use serde::{Deserialize, Serialize};
use tracing::{debug, info_span};

use crate::config::EngineConfig;
use crate::metrics::{
    breakdown, summarize, AgentPerformanceCalculator, AgentPerformanceMetrics, CallBreakdown,
    CallSummary, CustomerFeedbackExcerpt, CustomerVoiceAnalyzer, CustomerVoiceSentimentMetrics,
    FeedbackExcerptExtractor,
};
use crate::record::{CallBatch, DateRange, SummaryInput};

/// Everything the dashboard renders for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_range: Option<DateRange>,
    pub summary: CallSummary,
    pub breakdown: CallBreakdown,
    /// Summary input actually fed to the agent calculator.
    pub summary_input: SummaryInput,
    pub agent_performance: AgentPerformanceMetrics,
    pub customer_voice: CustomerVoiceSentimentMetrics,
    pub feedback_excerpts: Vec<CustomerFeedbackExcerpt>,
}

/// Runs the three calculators (plus the CDR summary) over a batch.
///
/// Stateless between runs; a single engine can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    agent: AgentPerformanceCalculator,
    voice: CustomerVoiceAnalyzer,
    excerpts: FeedbackExcerptExtractor,
}

impl AnalyticsEngine {
    /// Builds all calculators from a loaded config.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            agent: AgentPerformanceCalculator::new(),
            voice: CustomerVoiceAnalyzer::new(config.topics.clone()),
            excerpts: FeedbackExcerptExtractor::new(config.excerpts),
        }
    }

    pub fn agent(&self) -> &AgentPerformanceCalculator {
        &self.agent
    }

    pub fn voice(&self) -> &CustomerVoiceAnalyzer {
        &self.voice
    }

    pub fn excerpts(&self) -> &FeedbackExcerptExtractor {
        &self.excerpts
    }

    pub fn run(&self, batch: &CallBatch) -> DashboardReport {
        let records = batch.records.as_slice();
        let _span = info_span!("engine.run", records = records.len()).entered();

        let summary = {
            let _step = info_span!("engine.summary").entered();
            summarize(records)
        };

        let breakdown = {
            let _step = info_span!("engine.breakdown").entered();
            breakdown(records)
        };

        // Prefer the upstream summary; fall back to the derived one.
        let summary_input = match batch.summary {
            Some(input) => input,
            None => {
                debug!("No upstream summary, using derived recording percentage");
                summary.recording_input()
            }
        };

        let agent_performance = {
            let _step = info_span!("engine.agent_performance").entered();
            self.agent.compute(records, &summary_input)
        };

        let customer_voice = {
            let _step = info_span!("engine.customer_voice").entered();
            self.voice.compute(records)
        };

        let feedback_excerpts = {
            let _step = info_span!("engine.feedback_excerpts").entered();
            self.excerpts.extract(records)
        };

        debug!(
            analyzed = customer_voice.total_analyzed_calls,
            excerpts = feedback_excerpts.len(),
            "Dashboard report ready"
        );

        DashboardReport {
            date_range: batch.date_range.clone(),
            summary,
            breakdown,
            summary_input,
            agent_performance,
            customer_voice,
            feedback_excerpts,
        }
    }
}
