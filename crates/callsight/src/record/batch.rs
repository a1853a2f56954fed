//! Batch envelopes: the record slice plus the upstream summary and date range.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lenient, CallRecord};
use crate::error::InputError;
use crate::sanitize;

/// Pre-aggregated totals computed upstream. Only the recording share is
/// consumed; other keys are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SummaryInput {
    #[serde(deserialize_with = "lenient::percentage")]
    pub recording_percentage: f64,
}

impl SummaryInput {
    pub fn new(recording_percentage: f64) -> Self {
        Self {
            recording_percentage,
        }
    }
}

/// Informational only; records are expected to be scoped by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateRange {
    #[serde(deserialize_with = "lenient::string")]
    pub start_date: Option<String>,
    #[serde(deserialize_with = "lenient::string")]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CallBatch {
    pub records: Vec<CallRecord>,
    pub summary: Option<SummaryInput>,
    pub date_range: Option<DateRange>,
}

impl CallBatch {
    pub fn new(records: Vec<CallRecord>) -> Self {
        Self {
            records,
            summary: None,
            date_range: None,
        }
    }

    pub fn with_summary(mut self, summary: SummaryInput) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn with_date_range(mut self, date_range: DateRange) -> Self {
        self.date_range = Some(date_range);
        self
    }

    /// Accepts either a bare array of records or an envelope object
    /// `{ "records": [...], "summary": {...}, "dateRange": {...} }`.
    pub fn from_value(value: &Value) -> Result<Self, InputError> {
        match value {
            Value::Array(_) => Ok(Self::new(parse_records(value))),
            Value::Object(map) => {
                let records = match map.get("records") {
                    Some(records @ Value::Array(_)) => parse_records(records),
                    _ => return Err(InputError::UnexpectedShape),
                };
                let summary = map
                    .get("summary")
                    .filter(|v| v.is_object())
                    .and_then(|v| serde_json::from_value(v.clone()).ok());
                let date_range = map
                    .get("dateRange")
                    .filter(|v| v.is_object())
                    .and_then(|v| serde_json::from_value(v.clone()).ok());
                Ok(Self {
                    records,
                    summary,
                    date_range,
                })
            }
            _ => Err(InputError::UnexpectedShape),
        }
    }

    pub fn from_json_str(content: &str) -> Result<Self, InputError> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(&value)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, InputError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| InputError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        let batch = Self::from_json_str(&content)?;
        log::debug!(
            "Loaded {} records from {}",
            batch.records.len(),
            sanitize::redact_path(path)
        );
        Ok(batch)
    }
}

/// Converts a JSON array into records. Non-object elements are skipped with
/// a warning; anything other than an array yields an empty list.
pub fn parse_records(value: &Value) -> Vec<CallRecord> {
    let Some(items) = value.as_array() else {
        log::warn!("Expected an array of call records, got {}", type_name(value));
        return Vec::new();
    };

    items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            if !item.is_object() {
                log::warn!("Skipping call record #{}: not an object", index);
                return None;
            }
            match serde_json::from_value::<CallRecord>(item.clone()) {
                Ok(record) => Some(record),
                Err(e) => {
                    log::warn!("Skipping call record #{}: {}", index, e);
                    None
                }
            }
        })
        .collect()
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
