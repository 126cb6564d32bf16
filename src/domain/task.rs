use crate::domain::due_date::DueDate;
use crate::error::{Result, TaskifyError};
use crate::notice::Notice;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use uuid::Uuid;

/// Identifier of a task, unique within its board.
///
/// New tasks get a numeric id derived from the creation time in
/// milliseconds; string ids are accepted from older data.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    Numeric(u64),
    Text(String),
}

impl TaskId {
    /// Generates an id that is greater than every numeric id in `existing`.
    ///
    /// When the numeric space is exhausted the id falls back to a random
    /// text id.
    pub fn next<'a>(existing: impl IntoIterator<Item = &'a TaskId>, now: DateTime<Utc>) -> Self {
        let stamp = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        let highest = existing
            .into_iter()
            .filter_map(|id| match id {
                TaskId::Numeric(n) => Some(*n),
                TaskId::Text(_) => None,
            })
            .max();
        match highest {
            None => TaskId::Numeric(stamp),
            Some(n) => match n.checked_add(1) {
                Some(floor) => TaskId::Numeric(stamp.max(floor)),
                None => TaskId::Text(Uuid::new_v4().to_string()),
            },
        }
    }
}

impl FromStr for TaskId {
    type Err = TaskifyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(TaskifyError::InvalidTaskId(s.to_string()));
        }
        match trimmed.parse::<u64>() {
            Ok(n) => Ok(TaskId::Numeric(n)),
            Err(_) => Ok(TaskId::Text(trimmed.to_string())),
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{}", n),
            Self::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TaskStatus {
    #[default]
    #[serde(rename = "todo")]
    Todo,
    #[serde(rename = "in-progress", alias = "progress", alias = "in_progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// Wire value as stored in the board collection
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Todo => write!(f, "To Do"),
            Self::InProgress => write!(f, "In Progress"),
            Self::Done => write!(f, "Done"),
        }
    }
}

impl FromStr for TaskStatus {
    type Err = TaskifyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "todo" | "to-do" | "to do" => Ok(Self::Todo),
            "in-progress" | "in_progress" | "in progress" | "inprogress" | "progress" => {
                Ok(Self::InProgress)
            }
            "done" => Ok(Self::Done),
            _ => Err(TaskifyError::InvalidStatus(s.to_string())),
        }
    }
}

/// Priority of a task, ordered low < medium < high
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[serde(alias = "Low", alias = "LOW")]
    Low,
    #[default]
    #[serde(alias = "Medium", alias = "MEDIUM")]
    Medium,
    #[serde(alias = "High", alias = "HIGH")]
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Medium => write!(f, "Medium"),
            Self::High => write!(f, "High"),
        }
    }
}

impl FromStr for Priority {
    type Err = TaskifyError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(TaskifyError::InvalidPriority(s.to_string())),
        }
    }
}

/// Trims task text, rejecting blank input
pub(crate) fn validated_text(text: &str) -> Result<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(TaskifyError::Validation(Notice::EMPTY_TASK_TEXT.to_string()));
    }
    Ok(trimmed.to_string())
}

/// A task on a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub text: String,
    pub status: TaskStatus,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DueDate>,
    pub starred: bool,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Creates a todo task with medium priority and no due date
    pub fn new(id: TaskId, text: String) -> Self {
        Self {
            id,
            text,
            status: TaskStatus::Todo,
            priority: Priority::Medium,
            due_date: None,
            starred: false,
            created_at: Utc::now(),
        }
    }

    /// Builds a task from a draft, validating its text
    pub fn from_draft(id: TaskId, draft: TaskDraft) -> Result<Self> {
        let text = validated_text(&draft.text)?;
        Ok(Self {
            status: draft.status,
            priority: draft.priority,
            due_date: draft.due_date.map(DueDate::Date),
            ..Self::new(id, text)
        })
    }

    /// Applies an edit. Nothing changes if the edit is rejected.
    pub fn apply(&mut self, patch: TaskPatch) -> Result<()> {
        let text = match patch.text {
            Some(text) => Some(validated_text(&text)?),
            None => None,
        };

        if let Some(text) = text {
            self.text = text;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date.map(DueDate::Date);
        }
        Ok(())
    }

    pub fn toggle_star(&mut self) {
        self.starred = !self.starred;
    }

    /// Calendar due date; `None` when absent or stored as unparseable text
    pub fn due_on(&self) -> Option<NaiveDate> {
        self.due_date.as_ref().and_then(DueDate::date)
    }

    /// Case-insensitive substring match on the task text
    pub fn matches_text(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Input for creating a task
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskDraft {
    pub text: String,
    pub status: TaskStatus,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
}

impl TaskDraft {
    /// Days between today and the due date of a quick-added task
    pub const QUICK_DUE_IN_DAYS: i64 = 3;

    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// A draft due a few days from `today`
    pub fn quick(text: impl Into<String>, today: NaiveDate) -> Self {
        Self::new(text).with_due_date(today + Duration::days(Self::QUICK_DUE_IN_DAYS))
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Edit applied to an existing task; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub text: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date
    pub due_date: Option<Option<NaiveDate>>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
    }
}
