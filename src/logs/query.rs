use serde::Serialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::types::{FilterCriteria, LogEntry};

/// Most entries the log service is asked for in one fetch.
pub const RESULT_LIMIT: u32 = 100;

/// Query document understood by the action-log search endpoint.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct LogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<TimeRange>,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct TimeRange {
    #[serde(rename = "$gte")]
    pub from: String,
    #[serde(rename = "$lte")]
    pub to: String,
}

impl LogQuery {
    /// Only set fields are sent; the time range goes out only when both bounds are set.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let timestamp = match (criteria.start_time(), criteria.end_time()) {
            (Some(from), Some(to)) => Some(TimeRange {
                from: from.to_string(),
                to: to.to_string(),
            }),
            _ => None,
        };
        Self {
            actor: criteria.actor().map(str::to_string),
            endpoint: criteria.endpoint().map(str::to_string),
            timestamp,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

/// Result of one fetch cycle. A failure still displays as an empty list, but the
/// panel can tell it apart from a genuinely empty result.
#[derive(Clone, Debug, PartialEq)]
pub enum FetchOutcome {
    Loaded(Vec<LogEntry>),
    Failed(ApiError),
}

impl FetchOutcome {
    pub fn from_response(body: Result<Value, ApiError>) -> Self {
        match body {
            Ok(body) => FetchOutcome::Loaded(extract_action_logs(&body)),
            Err(err) => FetchOutcome::Failed(err),
        }
    }
}

/// Pulls `action_logs` out of a response body. A missing or non-array field yields
/// nothing; individual entries that are not objects are skipped.
pub fn extract_action_logs(body: &Value) -> Vec<LogEntry> {
    let Some(raw) = body.get("action_logs").and_then(Value::as_array) else {
        log::warn!("action log response has no action_logs array");
        return Vec::new();
    };
    raw.iter()
        .filter_map(|item| match serde_json::from_value::<LogEntry>(item.clone()) {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("skipping malformed action log: {}", err);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn criteria(actor: &str, endpoint: &str, start: &str, end: &str) -> FilterCriteria {
        FilterCriteria {
            actor: actor.to_string(),
            endpoint: endpoint.to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
        }
    }

    #[test]
    fn actor_and_full_range_without_endpoint() {
        let query = LogQuery::from_criteria(&criteria(
            "svc-A",
            "",
            "2024-01-01T00:00",
            "2024-01-02T00:00",
        ));
        let encoded: Value = serde_json::from_str(&query.to_json()).unwrap();
        assert_eq!(
            encoded,
            json!({
                "actor": "svc-A",
                "timestamp": {"$gte": "2024-01-01T00:00", "$lte": "2024-01-02T00:00"}
            })
        );
        assert!(encoded.get("endpoint").is_none());
    }

    #[test]
    fn a_single_bound_sends_no_range() {
        let query = LogQuery::from_criteria(&criteria("", "", "2024-01-01T00:00", ""));
        assert_eq!(query.timestamp, None);
        assert_eq!(query.to_json(), "{}");

        let query = LogQuery::from_criteria(&criteria("", "/redfish/v1", "", "2024-01-02T00:00"));
        assert_eq!(query.to_json(), r#"{"endpoint":"/redfish/v1"}"#);
    }

    #[test]
    fn response_entries_are_extracted() {
        let body = json!({
            "action_logs": [
                {
                    "_id": "65f0",
                    "timestamp": "2024-01-01T10:00:00Z",
                    "actor": "agent",
                    "endpoint": "/redfish/v1/Chassis/1/Power",
                    "method": "GET",
                    "status": 200,
                    "payload": {},
                    "response": {"PowerControl": []}
                },
                {"timestamp": "2024-01-01T10:00:05Z"}
            ]
        });
        let FetchOutcome::Loaded(entries) = FetchOutcome::from_response(Ok(body)) else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].actor.as_deref(), Some("agent"));
        assert_eq!(entries[0].status, Some(200));
        assert_eq!(entries[1].actor, None);
        assert_eq!(entries[1].payload, Value::Null);
    }

    #[test]
    fn unexpected_shapes_become_empty() {
        assert!(extract_action_logs(&json!({})).is_empty());
        assert!(extract_action_logs(&json!({"action_logs": {"not": "a list"}})).is_empty());
        assert!(extract_action_logs(&json!({"error": "boom"})).is_empty());
        assert_eq!(extract_action_logs(&json!({"action_logs": [42, {"actor": "user"}]})).len(), 1);
    }

    #[test]
    fn failures_keep_their_cause() {
        let outcome = FetchOutcome::from_response(Err(ApiError::Status(500)));
        assert_eq!(outcome, FetchOutcome::Failed(ApiError::Status(500)));
    }
}
