use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallsightError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Input error: {0}")]
    Input(#[from] InputError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Failed to parse config YAML: {0}")]
    ParseYaml(#[from] serde_yaml::Error),

    #[error("Config validation failed: {message}")]
    Validation { message: String },

    #[error("Schema validation failed: {errors}")]
    SchemaValidation { errors: String },

    #[error("Invalid topic rule '{topic}': {reason}")]
    InvalidTopicRule { topic: String, reason: String },
}

#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read batch file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse batch JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    #[error("Batch must be a JSON array of records or an object with a 'records' array")]
    UnexpectedShape,
}

pub type Result<T> = std::result::Result<T, CallsightError>;
