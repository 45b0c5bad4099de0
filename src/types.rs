use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One recorded interaction with a managed system, as returned by the action-log service.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct LogEntry {
    #[serde(rename = "_id", default)]
    pub id: Option<String>,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub actor: Option<String>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub method: Option<String>,
    #[serde(default)]
    pub status: Option<i64>,
    #[serde(default)]
    pub payload: Value,
    #[serde(default)]
    pub response: Value,
}

/// Client-side filter selections. Empty strings mean "not set".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub actor: String,
    pub endpoint: String,
    pub start_time: String,
    pub end_time: String,
}

impl FilterCriteria {
    pub fn actor(&self) -> Option<&str> {
        non_empty(&self.actor)
    }

    pub fn endpoint(&self) -> Option<&str> {
        non_empty(&self.endpoint)
    }

    pub fn start_time(&self) -> Option<&str> {
        non_empty(&self.start_time)
    }

    pub fn end_time(&self) -> Option<&str> {
        non_empty(&self.end_time)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub timestamp: Option<String>,
    pub id: Option<String>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            timestamp: None,
            id: None,
        }
    }

    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Bot,
            timestamp: None,
            id: None,
        }
    }
}

/// A persisted conversation turn: one user message paired with the assistant's answer.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ChatRecord {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub user_message: Option<String>,
    #[serde(default)]
    pub ai_response: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub user_id: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
    pub message: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatReply {
    pub response: String,
}
