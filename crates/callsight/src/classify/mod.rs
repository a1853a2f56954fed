pub mod sentiment;
pub mod topic;

pub use sentiment::{classify_excerpt, classify_record, majority, Sentiment, SentimentSource};
pub use topic::{default_topic_rules, excerpt_topic_rules, Topic, TopicCategorizer};
