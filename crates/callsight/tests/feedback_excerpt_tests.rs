//! Tests for feedback excerpt selection and formatting.

mod common;

use serde_json::json;

use common::{repeat_records, CallRecordBuilder, LONG_TRANSCRIPT};
use callsight::{ExcerptConfig, FeedbackExcerptExtractor, Sentiment};

#[test]
fn test_empty_input() {
    assert!(FeedbackExcerptExtractor::default().extract(&[]).is_empty());
}

#[test]
fn test_cap_and_eligibility() {
    let extractor = FeedbackExcerptExtractor::default();

    for n in [0, 1, 9, 10, 11, 40] {
        // Every third record has a short transcript, every fifth none at all
        let records = repeat_records(n, |i| {
            let builder = CallRecordBuilder::with_id(&format!("rec-{}", i));
            if i % 5 == 0 {
                builder
            } else if i % 3 == 0 {
                builder.transcript("too short")
            } else {
                builder.transcript(LONG_TRANSCRIPT)
            }
        });
        let eligible = records
            .iter()
            .filter(|r| r.transcript().is_some_and(|t| t.chars().count() > 50))
            .count();

        let excerpts = extractor.extract(&records);
        assert!(excerpts.len() <= 10, "n={}", n);
        assert!(excerpts.len() <= eligible, "n={}", n);
        assert_eq!(excerpts.len(), eligible.min(10), "n={}", n);
    }
}

#[test]
fn test_oversized_config_is_clamped() {
    let extractor = FeedbackExcerptExtractor::new(ExcerptConfig {
        limit: 50,
        max_text_chars: 1000,
        ..ExcerptConfig::default()
    });
    let records = repeat_records(20, |i| {
        CallRecordBuilder::with_id(&format!("rec-{}", i)).transcript(&"z".repeat(300))
    });

    let excerpts = extractor.extract(&records);
    assert_eq!(excerpts.len(), 10);
    assert!(excerpts.iter().all(|e| e.text.chars().count() == 201));
    assert_eq!(extractor.config().limit, 10);
}

#[test]
fn test_first_n_not_best_n() {
    let extractor = FeedbackExcerptExtractor::new(ExcerptConfig {
        limit: 2,
        ..ExcerptConfig::default()
    });
    let records = vec![
        CallRecordBuilder::with_id("neutral-1").transcript(LONG_TRANSCRIPT).build(),
        CallRecordBuilder::with_id("neutral-2").transcript(LONG_TRANSCRIPT).build(),
        CallRecordBuilder::with_id("glowing")
            .transcript(LONG_TRANSCRIPT)
            .two_party(json!("very positive"))
            .words(900)
            .build(),
    ];

    let ids: Vec<String> = extractor.extract(&records).into_iter().map(|e| e.id).collect();
    assert_eq!(ids, vec!["neutral-1", "neutral-2"]);
}

#[test]
fn test_excerpt_fields() {
    let records = vec![CallRecordBuilder::with_id("rec-42")
        .transcript(&"x".repeat(250))
        .custom_topic("Roaming charges")
        .two_party(json!({ "customerSentiment": "frustrated" }))
        .duration_seconds(312.5)
        .words(640)
        .created_at("2024-06-03T14:05:00Z")
        .build()];

    let excerpt = &FeedbackExcerptExtractor::default().extract(&records)[0];

    assert_eq!(excerpt.id, "rec-42");
    assert_eq!(excerpt.text, format!("{}…", "x".repeat(200)));
    assert_eq!(excerpt.topic, "Roaming charges");
    assert_eq!(excerpt.sentiment, Sentiment::Negative);
    assert_eq!(excerpt.duration_seconds, 312.5);
    assert_eq!(excerpt.word_count, 640);
    assert_eq!(
        excerpt.timestamp.map(|t| t.to_rfc3339()),
        Some("2024-06-03T14:05:00+00:00".to_string())
    );
}

#[test]
fn test_text_at_limit_is_not_truncated() {
    let text = "y".repeat(200);
    let records = vec![CallRecordBuilder::new().transcript(&text).build()];

    let excerpt = &FeedbackExcerptExtractor::default().extract(&records)[0];
    assert_eq!(excerpt.text, text);
}

#[test]
fn test_excerpt_sentiment_uses_two_party_only() {
    let records = vec![
        CallRecordBuilder::with_id("a")
            .transcript(LONG_TRANSCRIPT)
            .utterances(&["NEGATIVE", "NEGATIVE"])
            .build(),
        CallRecordBuilder::with_id("b")
            .transcript(LONG_TRANSCRIPT)
            .two_party(json!("customer satisfied"))
            .build(),
        CallRecordBuilder::with_id("c")
            .transcript(LONG_TRANSCRIPT)
            .two_party(json!("customer angry"))
            .build(),
    ];

    let sentiments: Vec<Sentiment> = FeedbackExcerptExtractor::default()
        .extract(&records)
        .into_iter()
        .map(|e| e.sentiment)
        .collect();
    assert_eq!(
        sentiments,
        vec![Sentiment::Neutral, Sentiment::Positive, Sentiment::Neutral]
    );
}

#[test]
fn test_summary_topic_keywords() {
    let records = vec![
        CallRecordBuilder::new()
            .transcript(LONG_TRANSCRIPT)
            .topic_summary("Product availability")
            .build(),
        CallRecordBuilder::new()
            .transcript(LONG_TRANSCRIPT)
            .topic_summary("Technical escalation")
            .build(),
        CallRecordBuilder::new()
            .transcript(LONG_TRANSCRIPT)
            .topic_summary("billing address change")
            .build(),
        CallRecordBuilder::new()
            .transcript(LONG_TRANSCRIPT)
            .topic_summary("support ticket")
            .build(),
        CallRecordBuilder::new().transcript(LONG_TRANSCRIPT).build(),
    ];

    let topics: Vec<String> = FeedbackExcerptExtractor::default()
        .extract(&records)
        .into_iter()
        .map(|e| e.topic)
        .collect();
    assert_eq!(
        topics,
        vec![
            "Product Inquiries",
            "Technical Support",
            "Billing",
            "General",
            "General"
        ]
    );
}

#[test]
fn test_serialized_shape() {
    let records = vec![CallRecordBuilder::with_id("a").transcript(LONG_TRANSCRIPT).build()];
    let excerpt = &FeedbackExcerptExtractor::default().extract(&records)[0];
    let value = serde_json::to_value(excerpt).unwrap();

    assert_eq!(value["sentiment"], json!("neutral"));
    assert_eq!(value["durationSeconds"], json!(0.0));
    assert_eq!(value["wordCount"], json!(0));
    assert!(value["timestamp"].is_null());
}
