use std::collections::HashSet;
use std::path::Path;

use crate::classify::Topic;
use crate::config::schema::{
    EngineConfig, CONFIG_VERSION, MAX_EXCERPT_LIMIT, MAX_EXCERPT_TEXT_CHARS,
};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../../../schema/engine-config-v1.json");

/// Loads a config file. `.yaml`/`.yml` files are parsed as YAML, anything
/// else as JSON.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if is_yaml {
        load_config_from_yaml_str(&content)
    } else {
        load_config_from_str(&content)
    }
}

pub fn load_config_from_str(content: &str) -> Result<EngineConfig, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;
    load_config_from_value(json_value)
}

pub fn load_config_from_yaml_str(content: &str) -> Result<EngineConfig, ConfigError> {
    let json_value: serde_json::Value = serde_yaml::from_str(content)?;
    load_config_from_value(json_value)
}

fn load_config_from_value(json_value: serde_json::Value) -> Result<EngineConfig, ConfigError> {
    validate_schema(&json_value)?;

    let config: EngineConfig = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

fn validate_config(config: &EngineConfig) -> Result<(), ConfigError> {
    // Validate version
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    // Validate topic rules
    let mut seen = HashSet::new();
    for rule in &config.topics {
        let topic = rule.topic.to_string();

        if rule.topic == Topic::Other {
            return Err(ConfigError::InvalidTopicRule {
                topic,
                reason: "'other' is the fallback topic and cannot have keywords".to_string(),
            });
        }

        if !seen.insert(rule.topic) {
            return Err(ConfigError::InvalidTopicRule {
                topic,
                reason: "Duplicate topic rule".to_string(),
            });
        }

        if rule.keywords.is_empty() {
            return Err(ConfigError::InvalidTopicRule {
                topic,
                reason: "At least one keyword is required".to_string(),
            });
        }

        if rule.keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ConfigError::InvalidTopicRule {
                topic,
                reason: "Keywords must not be blank".to_string(),
            });
        }
    }

    if !(1..=MAX_EXCERPT_LIMIT).contains(&config.excerpts.limit) {
        return Err(ConfigError::Validation {
            message: format!("excerpts.limit must be between 1 and {}", MAX_EXCERPT_LIMIT),
        });
    }

    if !(1..=MAX_EXCERPT_TEXT_CHARS).contains(&config.excerpts.max_text_chars) {
        return Err(ConfigError::Validation {
            message: format!(
                "excerpts.maxTextChars must be between 1 and {}",
                MAX_EXCERPT_TEXT_CHARS
            ),
        });
    }

    Ok(())
}
