use std::collections::{HashMap, VecDeque};
use std::sync::RwLock;

use chrono::{SecondsFormat, Utc};

use crate::services::{ActionLogQuery, ServiceError};
use crate::types::{ActionLog, ChatLog};

pub const RECENT_CHAT_LIMIT: usize = 10;

/// In-memory replacement for the user, chat and action-log collections.
/// Both collections keep at most `capacity` records.
pub struct MockStore {
    users: HashMap<String, String>,
    action_logs: RwLock<VecDeque<ActionLog>>,
    chat_logs: RwLock<VecDeque<ChatLog>>,
    capacity: usize,
}

pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

impl MockStore {
    pub fn new(users: Vec<(String, String)>, capacity: usize) -> Self {
        Self {
            users: users.into_iter().collect(),
            action_logs: RwLock::new(VecDeque::new()),
            chat_logs: RwLock::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    pub fn authenticate(&self, user_id: &str, password: &str) -> Result<(), ServiceError> {
        match self.users.get(user_id) {
            Some(expected) if expected == password => Ok(()),
            _ => Err(ServiceError::Unauthorized),
        }
    }

    /// Appends a log, dropping the oldest once the store is full.
    pub fn push_action_log(&self, log: ActionLog) {
        let mut logs = self
            .action_logs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        push_bounded(&mut logs, log, self.capacity);
    }

    /// Matching logs, newest first.
    pub fn query_action_logs(&self, query: &ActionLogQuery, limit: usize) -> Vec<ActionLog> {
        let logs = self
            .action_logs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut matching: Vec<ActionLog> =
            logs.iter().filter(|log| query.matches(log)).cloned().collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        matching
    }

    pub fn record_chat(&self, user_message: &str, ai_response: &str) -> ChatLog {
        let record = ChatLog {
            id: new_id(),
            timestamp: now_iso(),
            user_message: user_message.to_string(),
            ai_response: ai_response.to_string(),
        };
        let mut chats = self
            .chat_logs
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        push_bounded(&mut chats, record.clone(), self.capacity);
        record
    }

    /// The most recent turns, newest first.
    pub fn recent_chats(&self, limit: usize) -> Vec<ChatLog> {
        let chats = self
            .chat_logs
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut recent: Vec<ChatLog> = chats.iter().cloned().collect();
        recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        recent.truncate(limit);
        recent
    }
}

fn push_bounded<T>(records: &mut VecDeque<T>, record: T, capacity: usize) {
    records.push_back(record);
    while records.len() > capacity {
        records.pop_front();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn log(timestamp: &str, actor: &str) -> ActionLog {
        ActionLog {
            id: new_id(),
            timestamp: timestamp.to_string(),
            actor: actor.to_string(),
            endpoint: "/redfish/v1/Chassis/1/Power".to_string(),
            method: "GET".to_string(),
            status: 200,
            payload: Value::Null,
            response: Value::Null,
        }
    }

    #[test]
    fn credentials_must_match() {
        let store = MockStore::new(vec![("admin".to_string(), "pw".to_string())], 10);
        assert!(store.authenticate("admin", "pw").is_ok());
        assert!(matches!(store.authenticate("admin", "nope"), Err(ServiceError::Unauthorized)));
        assert!(matches!(store.authenticate("ghost", "pw"), Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn capacity_drops_the_oldest() {
        let store = MockStore::new(Vec::new(), 2);
        store.push_action_log(log("2024-01-01T00:00:01", "a"));
        store.push_action_log(log("2024-01-01T00:00:02", "b"));
        store.push_action_log(log("2024-01-01T00:00:03", "c"));
        let actors: Vec<String> = store
            .query_action_logs(&ActionLogQuery::default(), 10)
            .into_iter()
            .map(|l| l.actor)
            .collect();
        assert_eq!(actors, vec!["c", "b"]);
    }

    #[test]
    fn queries_are_newest_first_and_limited() {
        let store = MockStore::new(Vec::new(), 100);
        for second in 0..5 {
            store.push_action_log(log(&format!("2024-01-01T00:00:0{}", second), "agent"));
        }
        let page = store.query_action_logs(&ActionLogQuery::default(), 2);
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].timestamp, "2024-01-01T00:00:04");
        assert_eq!(page[1].timestamp, "2024-01-01T00:00:03");
    }

    #[test]
    fn chat_history_is_bounded() {
        let store = MockStore::new(Vec::new(), 10);
        for n in 0..12 {
            store.record_chat(&format!("q{}", n), &format!("a{}", n));
        }
        assert_eq!(store.recent_chats(RECENT_CHAT_LIMIT).len(), RECENT_CHAT_LIMIT);
    }

    #[test]
    fn chat_capacity_drops_the_oldest_turns() {
        let store = MockStore::new(Vec::new(), 2);
        for n in 0..3 {
            store.record_chat(&format!("q{}", n), &format!("a{}", n));
        }
        let mut kept: Vec<String> = store
            .recent_chats(RECENT_CHAT_LIMIT)
            .into_iter()
            .map(|chat| chat.user_message)
            .collect();
        kept.sort();
        assert_eq!(kept, vec!["q1", "q2"]);
    }
}
