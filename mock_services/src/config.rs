use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub users: Vec<(String, String)>,
    pub action_log_interval: Duration,
    pub action_log_capacity: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| "127.0.0.1:8002".to_string()),
            users: parse_users(
                &std::env::var("MOCK_USERS").unwrap_or_else(|_| "admin:admin".to_string()),
            ),
            action_log_interval: Duration::from_secs(env_number("ACTION_LOG_INTERVAL_SECS", 3)),
            action_log_capacity: env_number("ACTION_LOG_CAPACITY", 1000) as usize,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:8002".to_string(),
            users: parse_users("admin:admin"),
            action_log_interval: Duration::from_secs(3),
            action_log_capacity: 1000,
        }
    }
}

fn env_number(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::warn!("ignoring {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

/// `id:password,id:password`. Malformed pairs are skipped.
pub fn parse_users(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (id, password) = pair.trim().split_once(':')?;
            if id.is_empty() {
                return None;
            }
            Some((id.to_string(), password.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_list_parsing() {
        assert_eq!(
            parse_users("admin:admin, ops:s3cr:et ,broken,:nameless"),
            vec![
                ("admin".to_string(), "admin".to_string()),
                ("ops".to_string(), "s3cr:et".to_string()),
            ]
        );
        assert!(parse_users("").is_empty());
    }
}
