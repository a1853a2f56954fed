use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::schema::TopicRule;
use crate::record::CallRecord;

/// Fixed topic taxonomy shown on the customer-voice dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    ProductInquiries,
    TechnicalSupport,
    Billing,
    General,
    Other,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::ProductInquiries,
        Topic::TechnicalSupport,
        Topic::Billing,
        Topic::General,
        Topic::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Topic::ProductInquiries => "Product Inquiries",
            Topic::TechnicalSupport => "Technical Support",
            Topic::Billing => "Billing",
            Topic::General => "General",
            Topic::Other => "Other",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered keyword classifier. Rules are evaluated top to bottom and the
/// first rule with a keyword contained in the text wins.
#[derive(Debug, Clone)]
pub struct TopicCategorizer {
    rules: Vec<TopicRule>,
    fallback: Topic,
}

impl TopicCategorizer {
    pub fn new(rules: Vec<TopicRule>) -> Self {
        Self::with_fallback(rules, Topic::Other)
    }

    pub fn with_fallback(rules: Vec<TopicRule>, fallback: Topic) -> Self {
        // Matching runs on lowercased text
        let rules = rules
            .into_iter()
            .map(|rule| TopicRule {
                topic: rule.topic,
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();

        Self { rules, fallback }
    }

    /// Categorizer used for feedback excerpts: a reduced keyword table that
    /// defaults to `General`.
    pub fn for_excerpts() -> Self {
        Self::with_fallback(excerpt_topic_rules(), Topic::General)
    }

    pub fn rules(&self) -> &[TopicRule] {
        &self.rules
    }

    pub fn fallback(&self) -> Topic {
        self.fallback
    }

    pub fn categorize(&self, text: &str) -> Topic {
        self.categorize_any(&[text])
    }

    /// Classifies several candidate texts at once. Rule order takes
    /// precedence over text order: an earlier rule matching the second text
    /// beats a later rule matching the first.
    pub fn categorize_any(&self, texts: &[&str]) -> Topic {
        let lowered: Vec<String> = texts.iter().map(|t| t.to_lowercase()).collect();

        for rule in &self.rules {
            let hit = rule
                .keywords
                .iter()
                .any(|keyword| lowered.iter().any(|text| text.contains(keyword.as_str())));
            if hit {
                return rule.topic;
            }
        }

        self.fallback
    }

    /// Topic for a call record: the custom (or LeMUR) topic, with the topic
    /// detection summary as fallback text.
    pub fn categorize_record(&self, record: &CallRecord) -> Topic {
        let texts: Vec<&str> = [
            record.custom_topic().or_else(|| record.lemur_topic()),
            record.topic_summary(),
        ]
        .into_iter()
        .flatten()
        .collect();

        self.categorize_any(&texts)
    }
}

impl Default for TopicCategorizer {
    fn default() -> Self {
        Self::new(default_topic_rules())
    }
}

fn rule(topic: Topic, keywords: &[&str]) -> TopicRule {
    TopicRule {
        topic,
        keywords: keywords.iter().map(|k| k.to_string()).collect(),
    }
}

/// The dashboard's topic table, in precedence order.
pub fn default_topic_rules() -> Vec<TopicRule> {
    vec![
        rule(Topic::ProductInquiries, &["product", "feature"]),
        rule(Topic::TechnicalSupport, &["technical", "support", "issue"]),
        rule(Topic::Billing, &["billing", "payment", "invoice", "account"]),
        rule(Topic::General, &["general", "info"]),
    ]
}

pub fn excerpt_topic_rules() -> Vec<TopicRule> {
    vec![
        rule(Topic::ProductInquiries, &["product"]),
        rule(Topic::TechnicalSupport, &["technical"]),
        rule(Topic::Billing, &["billing"]),
    ]
}
