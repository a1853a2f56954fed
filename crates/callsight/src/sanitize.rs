//! Helpers for sanitizing data before it enters tracing span attributes.
//!
//! Call records carry customer speech and phone numbers. These functions make
//! sure spans and log lines only ever see file names and opaque hashes.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Returns only the filename component of a path (no directory).
pub fn redact_path(path: &Path) -> String {
    path.file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("<unknown>")
        .to_string()
}

/// Returns a short deterministic hash of a record key for correlation
/// without exposing the key itself (recording file names embed numbers).
pub fn hash_id(id: &str) -> String {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    format!("{:016x}", hasher.finish())
}

/// Masks all but the last four digits of a phone number or extension.
///
/// - `+41791234567` → `********4567`
/// - `101` → `101` (short extensions are not sensitive)
pub fn mask_number(number: &str) -> String {
    let trimmed = number.trim();
    let len = trimmed.chars().count();
    if len <= 5 {
        return trimmed.to_string();
    }
    trimmed
        .chars()
        .enumerate()
        .map(|(i, c)| if i < len - 4 { '*' } else { c })
        .collect()
}
