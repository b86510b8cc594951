//! Changelog entries for applied view commands

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A record of one state-changing command
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique ID for this entry (ULID format)
    pub id: String,

    /// When the command was applied
    pub timestamp: DateTime<Utc>,

    /// Canonical op string (e.g., "add filter", "toggle selection")
    pub op: String,

    /// The command as JSON
    pub input: Value,

    /// Store revision after the command was applied
    pub revision: u64,

    /// Who issued the command (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actor: Option<String>,
}

impl LogEntry {
    pub fn new(op: impl Into<String>, input: Value, revision: u64) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            timestamp: Utc::now(),
            op: op.into(),
            input,
            revision,
            actor: None,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

/// Outcome of dispatching a command
///
/// - Logged: the state changed and a changelog entry was written
/// - Unlogged: the command was valid but left the state as it was
/// - Failed: the command was rejected; the prior state is retained
#[derive(Debug)]
pub enum ExecutionResult<T, E> {
    Logged { value: T, log_entry: LogEntry },
    Unlogged { value: T },
    Failed { error: E },
}

impl<T, E> ExecutionResult<T, E> {
    pub fn into_result(self) -> Result<T, E> {
        match self {
            Self::Logged { value, .. } | Self::Unlogged { value } => Ok(value),
            Self::Failed { error } => Err(error),
        }
    }

    /// Get the value and log entry separately
    pub fn split(self) -> (Result<T, E>, Option<LogEntry>) {
        match self {
            Self::Logged { value, log_entry } => (Ok(value), Some(log_entry)),
            Self::Unlogged { value } => (Ok(value), None),
            Self::Failed { error } => (Err(error), None),
        }
    }

    pub fn is_logged(&self) -> bool {
        matches!(self, Self::Logged { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_entry_has_ulid_id() {
        let entry = LogEntry::new("add filter", json!({"field": "status"}), 1);
        assert_eq!(entry.id.len(), 26);
        assert!(ulid::Ulid::from_string(&entry.id).is_ok());
        assert!(entry.actor.is_none());
    }

    #[test]
    fn actor_is_omitted_when_absent() {
        let entry = LogEntry::new("clear sorts", json!({}), 2);
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("actor").is_none());

        let entry = entry.with_actor("alice");
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["actor"], "alice");
    }

    #[test]
    fn split_separates_log_entry() {
        let logged: ExecutionResult<u8, String> = ExecutionResult::Logged {
            value: 1,
            log_entry: LogEntry::new("set search", json!("q"), 1),
        };
        assert!(logged.is_logged());
        let (value, entry) = logged.split();
        assert_eq!(value, Ok(1));
        assert!(entry.is_some());

        let failed: ExecutionResult<u8, String> = ExecutionResult::Failed {
            error: "nope".into(),
        };
        assert_eq!(failed.into_result(), Err("nope".to_string()));
    }
}
