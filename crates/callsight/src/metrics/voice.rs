use serde::{Deserialize, Serialize};

use super::{mean, percent, round2};
use crate::classify::{classify_record, Sentiment, Topic, TopicCategorizer};
use crate::config::TopicRule;
use crate::record::CallRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopicDistribution {
    pub product_inquiries: f64,
    pub technical_support: f64,
    pub billing: f64,
    pub general: f64,
    pub other: f64,
}

impl TopicDistribution {
    pub fn get(&self, topic: Topic) -> f64 {
        match topic {
            Topic::ProductInquiries => self.product_inquiries,
            Topic::TechnicalSupport => self.technical_support,
            Topic::Billing => self.billing,
            Topic::General => self.general,
            Topic::Other => self.other,
        }
    }

    pub fn total(&self) -> f64 {
        Topic::ALL.iter().map(|t| self.get(*t)).sum()
    }

    fn from_counts(counts: &[usize; 5]) -> Self {
        let total: usize = counts.iter().sum();
        let share = |topic: Topic| round2(percent(counts[topic as usize], total));
        Self {
            product_inquiries: share(Topic::ProductInquiries),
            technical_support: share(Topic::TechnicalSupport),
            billing: share(Topic::Billing),
            general: share(Topic::General),
            other: share(Topic::Other),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl SentimentBreakdown {
    pub fn get(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    pub fn total(&self) -> f64 {
        self.positive + self.neutral + self.negative
    }

    fn from_counts(counts: &[usize; 3]) -> Self {
        let total: usize = counts.iter().sum();
        let share = |sentiment: Sentiment| round2(percent(counts[sentiment as usize], total));
        Self {
            positive: share(Sentiment::Positive),
            neutral: share(Sentiment::Neutral),
            negative: share(Sentiment::Negative),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerVoiceSentimentMetrics {
    pub topic_distribution: TopicDistribution,
    pub sentiment_breakdown: SentimentBreakdown,
    pub total_analyzed_calls: u64,
    /// Mean of per-call sentiment scores (0–1).
    pub average_sentiment_score: f64,
}

/// Topic and sentiment aggregation over records that carry a voice signal.
#[derive(Debug, Clone, Default)]
pub struct CustomerVoiceAnalyzer {
    categorizer: TopicCategorizer,
}

impl CustomerVoiceAnalyzer {
    pub fn new(rules: Vec<TopicRule>) -> Self {
        Self {
            categorizer: TopicCategorizer::new(rules),
        }
    }

    pub fn categorizer(&self) -> &TopicCategorizer {
        &self.categorizer
    }

    pub fn compute(&self, records: &[CallRecord]) -> CustomerVoiceSentimentMetrics {
        let mut topic_counts = [0usize; 5];
        let mut sentiment_counts = [0usize; 3];
        let mut score_sum = 0.0;
        let mut scored = 0usize;
        let mut analyzed = 0usize;

        for record in records.iter().filter(|r| r.has_voice_signal()) {
            analyzed += 1;

            let topic = self.categorizer.categorize_record(record);
            topic_counts[topic as usize] += 1;

            if let Some((sentiment, score)) = classify_record(record) {
                sentiment_counts[sentiment as usize] += 1;
                score_sum += score;
                scored += 1;
            }
        }

        if analyzed == 0 {
            return CustomerVoiceSentimentMetrics::default();
        }

        tracing::debug!(analyzed, scored, "Computed customer voice metrics");

        CustomerVoiceSentimentMetrics {
            topic_distribution: TopicDistribution::from_counts(&topic_counts),
            sentiment_breakdown: SentimentBreakdown::from_counts(&sentiment_counts),
            total_analyzed_calls: analyzed as u64,
            average_sentiment_score: round2(mean(score_sum, scored)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(value: serde_json::Value) -> Vec<CallRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_no_signal_is_all_zero() {
        let analyzer = CustomerVoiceAnalyzer::default();
        let records = records(json!([{ "transcriptionText": "hello" }, {}]));

        let metrics = analyzer.compute(&records);
        assert_eq!(metrics, CustomerVoiceSentimentMetrics::default());
        assert_eq!(analyzer.compute(&[]).total_analyzed_calls, 0);
    }

    #[test]
    fn test_topic_distribution() {
        let analyzer = CustomerVoiceAnalyzer::default();
        let records = records(json!([
            { "customTopic": "product billing question" },
            { "customTopic": "Payment failed" },
            { "topicDetectionSummary": "network issue" },
            { "customTopic": "weather" }
        ]));

        let metrics = analyzer.compute(&records);
        assert_eq!(metrics.total_analyzed_calls, 4);
        assert_eq!(metrics.topic_distribution.product_inquiries, 25.0);
        assert_eq!(metrics.topic_distribution.billing, 25.0);
        assert_eq!(metrics.topic_distribution.technical_support, 25.0);
        assert_eq!(metrics.topic_distribution.other, 25.0);
        assert_eq!(metrics.topic_distribution.general, 0.0);
    }

    #[test]
    fn test_sentiment_breakdown_and_score() {
        let analyzer = CustomerVoiceAnalyzer::default();
        let records = records(json!([
            { "sentimentAnalysis": [{ "sentiment": "POSITIVE" }, { "sentiment": "POSITIVE" }, { "sentiment": "NEGATIVE" }] },
            { "lemurAnalysis": { "sentimentAnalysis": { "customerSentiment": "NEGATIVE" } } },
            { "twoPartySentiment": "neutral tone" },
            { "customTopic": "billing" }
        ]));

        let metrics = analyzer.compute(&records);
        assert_eq!(metrics.total_analyzed_calls, 4);
        assert_eq!(metrics.sentiment_breakdown.positive, 33.33);
        assert_eq!(metrics.sentiment_breakdown.negative, 33.33);
        assert_eq!(metrics.sentiment_breakdown.neutral, 33.33);
        // (0.8 + 0.2 + 0.5) / 3
        assert_eq!(metrics.average_sentiment_score, 0.5);
    }

    #[test]
    fn test_topics_without_sentiment() {
        let analyzer = CustomerVoiceAnalyzer::default();
        let records = records(json!([{ "customTopic": "general info" }]));

        let metrics = analyzer.compute(&records);
        assert_eq!(metrics.topic_distribution.general, 100.0);
        assert_eq!(metrics.sentiment_breakdown, SentimentBreakdown::default());
        assert_eq!(metrics.average_sentiment_score, 0.0);
    }

    #[test]
    fn test_distributions_sum_to_hundred() {
        let analyzer = CustomerVoiceAnalyzer::default();
        let records = records(json!([
            { "customTopic": "product", "twoPartySentiment": "happy" },
            { "customTopic": "support", "twoPartySentiment": "angry" },
            { "customTopic": "billing", "twoPartySentiment": "fine" },
            { "customTopic": "info", "twoPartySentiment": "happy" },
            { "customTopic": "misc", "twoPartySentiment": "happy" },
            { "customTopic": "product", "twoPartySentiment": "angry" }
        ]));

        let metrics = analyzer.compute(&records);
        assert!((metrics.topic_distribution.total() - 100.0).abs() <= 0.1);
        assert!((metrics.sentiment_breakdown.total() - 100.0).abs() <= 0.1);
    }

    #[test]
    fn test_custom_rules_change_classification() {
        let analyzer = CustomerVoiceAnalyzer::new(vec![TopicRule {
            topic: Topic::Billing,
            keywords: vec!["refund".to_string()],
        }]);
        let records = records(json!([{ "customTopic": "product refund" }]));

        let metrics = analyzer.compute(&records);
        assert_eq!(metrics.topic_distribution.billing, 100.0);
    }
}
