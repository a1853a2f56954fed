pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod record;
pub mod sanitize;

pub use classify::{Sentiment, Topic, TopicCategorizer};
pub use config::{load_config, EngineConfig, ExcerptConfig, TopicRule};
pub use engine::{AnalyticsEngine, DashboardReport};
pub use error::{CallsightError, ConfigError, InputError, Result};
pub use metrics::{
    breakdown, summarize, AgentPerformanceCalculator, AgentPerformanceMetrics, CallBreakdown,
    CallSummary, CustomerFeedbackExcerpt, CustomerVoiceAnalyzer, CustomerVoiceSentimentMetrics,
    FeedbackExcerptExtractor,
};
pub use record::{parse_records, CallBatch, CallRecord, DateRange, SummaryInput};
