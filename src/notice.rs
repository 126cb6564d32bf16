//! Transient user-visible messages.
//!
//! Every store action has a fixed notice; notices expire after a fixed
//! interval and are dropped from the queue once expired.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Severity of a notice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Info,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Info => write!(f, "info"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// A completed store action that is reported back to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    BoardCreated,
    BoardDeleted,
    BoardStarred,
    TaskAdded,
    TaskUpdated,
    TaskDeleted,
    TaskStatusChanged,
    TaskStarred,
}

impl Action {
    pub fn severity(self) -> Severity {
        match self {
            Self::BoardCreated | Self::TaskAdded | Self::TaskUpdated => Severity::Success,
            _ => Severity::Info,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::BoardCreated => "Board created successfully",
            Self::BoardDeleted => "Board deleted successfully",
            Self::BoardStarred => "Board starred",
            Self::TaskAdded => "Task added successfully",
            Self::TaskUpdated => "Task updated successfully",
            Self::TaskDeleted => "Task deleted successfully",
            Self::TaskStatusChanged => "Task status updated",
            Self::TaskStarred => "Task starred",
        }
    }
}

/// A single notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub severity: Severity,
    pub message: String,
    pub issued_at: DateTime<Utc>,
}

impl Notice {
    pub const SAVE_FAILED: &'static str = "Failed to save data";
    pub const EMPTY_BOARD_NAME: &'static str = "Board name cannot be empty";
    pub const EMPTY_TASK_TEXT: &'static str = "Task description cannot be empty";

    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            issued_at: Utc::now(),
        }
    }

    pub fn for_action(action: Action) -> Self {
        Self::new(action.severity(), action.message())
    }

    /// Returns true once `ttl` has elapsed since the notice was issued
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.issued_at >= ttl
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

/// Queue of live notices with a shared auto-dismiss interval
#[derive(Debug, Clone)]
pub struct Notices {
    ttl: Duration,
    items: VecDeque<Notice>,
}

impl Notices {
    pub const DEFAULT_TTL_SECS: i64 = 3;

    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            items: VecDeque::new(),
        }
    }

    pub fn push(&mut self, notice: Notice) {
        self.items.push_back(notice);
    }

    /// Drops expired notices and returns the ones still showing
    pub fn active(&mut self, now: DateTime<Utc>) -> impl Iterator<Item = &Notice> {
        let ttl = self.ttl;
        self.items.retain(|n| !n.is_expired(now, ttl));
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for Notices {
    fn default() -> Self {
        Self::new(Duration::seconds(Self::DEFAULT_TTL_SECS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_messages() {
        let notice = Notice::for_action(Action::BoardCreated);
        assert_eq!(notice.severity, Severity::Success);
        assert_eq!(notice.message, "Board created successfully");

        let notice = Notice::for_action(Action::TaskStatusChanged);
        assert_eq!(notice.severity, Severity::Info);
        assert_eq!(notice.message, "Task status updated");
    }

    #[test]
    fn test_notice_expiry() {
        let notice = Notice::new(Severity::Info, "hello");
        let ttl = Duration::seconds(3);

        assert!(!notice.is_expired(notice.issued_at, ttl));
        assert!(!notice.is_expired(notice.issued_at + Duration::seconds(2), ttl));
        assert!(notice.is_expired(notice.issued_at + Duration::seconds(3), ttl));
    }

    #[test]
    fn test_queue_drops_expired() {
        let mut notices = Notices::default();
        let first = Notice::for_action(Action::TaskAdded);
        let issued = first.issued_at;
        notices.push(first);

        let mut late = Notice::for_action(Action::TaskDeleted);
        late.issued_at = issued + Duration::seconds(2);
        notices.push(late);

        let showing: Vec<_> = notices
            .active(issued + Duration::seconds(4))
            .map(|n| n.message.clone())
            .collect();
        assert_eq!(showing, vec!["Task deleted successfully".to_string()]);
        assert_eq!(notices.len(), 1);
    }

    #[test]
    fn test_display() {
        let notice = Notice::new(Severity::Error, Notice::SAVE_FAILED);
        assert_eq!(notice.to_string(), "[error] Failed to save data");
    }
}
