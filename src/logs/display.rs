use std::fmt::Display;

use chrono::TimeZone;

use crate::time::{parse_instant, truncate_to_millis};
use crate::types::LogEntry;

pub fn actor_label(entry: &LogEntry) -> String {
    entry
        .actor
        .as_deref()
        .filter(|actor| !actor.is_empty())
        .map_or_else(|| "UNKNOWN".to_string(), str::to_uppercase)
}

/// `GET:200`, with placeholders for whatever the service left out.
pub fn method_status_label(entry: &LogEntry) -> String {
    let method = entry
        .method
        .as_deref()
        .filter(|method| !method.is_empty())
        .map_or_else(|| "METHOD".to_string(), str::to_uppercase);
    let status = entry
        .status
        .map_or_else(|| "?".to_string(), |status| status.to_string());
    format!("{}:{}", method, status)
}

pub fn is_success(entry: &LogEntry) -> bool {
    entry.status == Some(200)
}

/// Wall-clock time in `zone`, or the raw value when it does not parse.
pub fn timestamp_label<Tz>(entry: &LogEntry, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let normalized = truncate_to_millis(&entry.timestamp);
    match parse_instant(&normalized, zone) {
        Some(at) => at.with_timezone(zone).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => entry.timestamp.clone(),
    }
}

/// Duplicate timestamps are common, so the position is part of the key.
pub fn row_key(entry: &LogEntry, position: usize) -> String {
    format!("{}-{}", entry.timestamp, position)
}

pub fn pretty_json(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
