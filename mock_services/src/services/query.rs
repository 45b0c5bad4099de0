use serde::Deserialize;

use crate::services::ServiceError;
use crate::types::ActionLog;

/// The subset of the document-store filter language the dashboard sends.
#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct ActionLogQuery {
    pub actor: Option<String>,
    pub endpoint: Option<String>,
    pub timestamp: Option<TimestampRange>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
pub struct TimestampRange {
    #[serde(rename = "$gte")]
    pub gte: Option<String>,
    #[serde(rename = "$lte")]
    pub lte: Option<String>,
}

impl ActionLogQuery {
    /// A missing parameter matches everything.
    pub fn parse(raw: Option<&str>) -> Result<Self, ServiceError> {
        match raw {
            None => Ok(Self::default()),
            Some(raw) if raw.trim().is_empty() => Ok(Self::default()),
            Some(raw) => serde_json::from_str(raw)
                .map_err(|e| ServiceError::InvalidInput(format!("invalid query: {}", e))),
        }
    }

    /// Timestamps compare as strings, the way the store compares ISO-8601 text.
    pub fn matches(&self, log: &ActionLog) -> bool {
        if let Some(actor) = &self.actor {
            if &log.actor != actor {
                return false;
            }
        }
        if let Some(endpoint) = &self.endpoint {
            if &log.endpoint != endpoint {
                return false;
            }
        }
        if let Some(range) = &self.timestamp {
            if let Some(gte) = &range.gte {
                if log.timestamp.as_str() < gte.as_str() {
                    return false;
                }
            }
            if let Some(lte) = &range.lte {
                if log.timestamp.as_str() > lte.as_str() {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn log(timestamp: &str, actor: &str, endpoint: &str) -> ActionLog {
        ActionLog {
            id: "x".to_string(),
            timestamp: timestamp.to_string(),
            actor: actor.to_string(),
            endpoint: endpoint.to_string(),
            method: "GET".to_string(),
            status: 200,
            payload: Value::Null,
            response: Value::Null,
        }
    }

    #[test]
    fn empty_query_matches_all() {
        let query = ActionLogQuery::parse(None).unwrap();
        assert!(query.matches(&log("2024-01-01T00:00:00", "agent", "/a")));
        assert_eq!(ActionLogQuery::parse(Some("{}")).unwrap(), ActionLogQuery::default());
    }

    #[test]
    fn exact_fields_and_inclusive_range() {
        let query = ActionLogQuery::parse(Some(
            r#"{"actor":"agent","timestamp":{"$gte":"2024-01-01T10:00","$lte":"2024-01-01T11:00"}}"#,
        ))
        .unwrap();
        assert!(query.matches(&log("2024-01-01T10:30:00+00:00", "agent", "/a")));
        assert!(query.matches(&log("2024-01-01T10:00", "agent", "/a")));
        assert!(!query.matches(&log("2024-01-01T10:30:00+00:00", "user", "/a")));
        assert!(!query.matches(&log("2024-01-01T11:30:00+00:00", "agent", "/a")));
        assert!(!query.matches(&log("2024-01-01T09:59:59+00:00", "agent", "/a")));
    }

    #[test]
    fn malformed_query_is_rejected() {
        assert!(matches!(
            ActionLogQuery::parse(Some("{not json")),
            Err(ServiceError::InvalidInput(_))
        ));
    }
}
