//! Table-driven tests for configuration loading and validation.
//!
//! Tests cover JSON and YAML config strings as well as files on disk.

use std::fs;

use tempfile::TempDir;

use callsight::config::{load_config, load_config_from_str};
use callsight::{AnalyticsEngine, CallBatch, ConfigError, Topic};

/// Represents a single config loading test case.
struct ConfigTestCase {
    /// Test case name for identification.
    name: &'static str,
    /// The config JSON content to test.
    config_json: &'static str,
    /// Whether loading should succeed.
    should_succeed: bool,
    /// Expected error substring (if should_succeed is false).
    expected_error: Option<&'static str>,
}

/// All JSON config loading test cases.
const JSON_CONFIG_TESTS: &[ConfigTestCase] = &[
    ConfigTestCase {
        name: "valid_minimal",
        config_json: r#"{ "version": "1.0" }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_full",
        config_json: r#"{
            "version": "1.0",
            "topics": [
                { "topic": "product_inquiries", "keywords": ["product", "feature", "upgrade"] },
                { "topic": "technical_support", "keywords": ["technical", "outage"] },
                { "topic": "billing", "keywords": ["billing", "refund"] },
                { "topic": "general", "keywords": ["general"] }
            ],
            "excerpts": { "limit": 10, "minTranscriptChars": 80, "maxTextChars": 200 }
        }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "valid_empty_topic_table",
        config_json: r#"{ "version": "1.0", "topics": [] }"#,
        should_succeed: true,
        expected_error: None,
    },
    ConfigTestCase {
        name: "missing_version",
        config_json: r#"{ "topics": [] }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "unsupported_version",
        config_json: r#"{ "version": "0.9" }"#,
        should_succeed: false,
        expected_error: Some("Unsupported config version"),
    },
    ConfigTestCase {
        name: "unknown_topic",
        config_json: r#"{ "version": "1.0", "topics": [{ "topic": "sales", "keywords": ["buy"] }] }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "empty_keyword_list",
        config_json: r#"{ "version": "1.0", "topics": [{ "topic": "billing", "keywords": [] }] }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "duplicate_topic",
        config_json: r#"{
            "version": "1.0",
            "topics": [
                { "topic": "general", "keywords": ["general"] },
                { "topic": "general", "keywords": ["info"] }
            ]
        }"#,
        should_succeed: false,
        expected_error: Some("Duplicate topic rule"),
    },
    ConfigTestCase {
        name: "negative_limit",
        config_json: r#"{ "version": "1.0", "excerpts": { "limit": -1 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "limit_above_maximum",
        config_json: r#"{ "version": "1.0", "excerpts": { "limit": 11 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "text_length_above_maximum",
        config_json: r#"{ "version": "1.0", "excerpts": { "maxTextChars": 201 } }"#,
        should_succeed: false,
        expected_error: Some("Schema validation failed"),
    },
    ConfigTestCase {
        name: "not_json",
        config_json: "version = 1.0",
        should_succeed: false,
        expected_error: Some("Failed to parse config JSON"),
    },
];

#[test]
fn test_json_config_loading() {
    for test_case in JSON_CONFIG_TESTS {
        let result = load_config_from_str(test_case.config_json);

        if test_case.should_succeed {
            assert!(
                result.is_ok(),
                "Test '{}': Expected success, got error: {:?}",
                test_case.name,
                result.err()
            );
        } else {
            let err = match result {
                Ok(_) => panic!("Test '{}': Expected failure, got success", test_case.name),
                Err(e) => e.to_string(),
            };
            if let Some(expected) = test_case.expected_error {
                assert!(
                    err.contains(expected),
                    "Test '{}': Expected error containing '{}', got '{}'",
                    test_case.name,
                    expected,
                    err
                );
            }
        }
    }
}

#[test]
fn test_load_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{ "version": "1.0", "excerpts": { "limit": 4 } }"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.excerpts.limit, 4);
    assert_eq!(config.topics[0].topic, Topic::ProductInquiries);
}

#[test]
fn test_load_yaml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yml");
    fs::write(
        &path,
        "version: \"1.0\"\ntopics:\n  - topic: billing\n    keywords: [refund]\n",
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    assert_eq!(config.topics.len(), 1);
    assert_eq!(config.topics[0].topic, Topic::Billing);
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    let result = load_config(dir.path().join("absent.json"));

    assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
}

#[test]
fn test_loaded_config_drives_engine() {
    let config = load_config_from_str(
        r#"{
            "version": "1.0",
            "topics": [{ "topic": "billing", "keywords": ["roaming"] }],
            "excerpts": { "limit": 1, "minTranscriptChars": 5, "maxTextChars": 4 }
        }"#,
    )
    .unwrap();
    let batch = CallBatch::from_json_str(
        r#"[
            { "id": "a", "customTopic": "Roaming fees", "transcriptionText": "roaming abroad" },
            { "id": "b", "customTopic": "product", "transcriptionText": "second call" }
        ]"#,
    )
    .unwrap();

    let report = AnalyticsEngine::from_config(&config).run(&batch);

    assert_eq!(report.customer_voice.topic_distribution.billing, 50.0);
    // "product" is not in the configured table
    assert_eq!(report.customer_voice.topic_distribution.other, 50.0);
    assert_eq!(report.feedback_excerpts.len(), 1);
    assert_eq!(report.feedback_excerpts[0].text, "roam…");
}
