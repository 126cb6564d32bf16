use crate::domain::task::{Task, TaskDraft, TaskId};
use crate::error::{Result, TaskifyError};
use crate::notice::Notice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a board
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoardId(String);

impl BoardId {
    /// Generates a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for BoardId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for BoardId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for BoardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named board owning an ordered list of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,
    pub name: String,
    pub starred: bool,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<Task>,
}

impl Board {
    /// Creates an empty, unstarred board. The name is trimmed and must not be blank.
    pub fn new(name: &str) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TaskifyError::Validation(Notice::EMPTY_BOARD_NAME.to_string()));
        }
        Ok(Self {
            id: BoardId::generate(),
            name: name.to_string(),
            starred: false,
            created_at: Utc::now(),
            tasks: Vec::new(),
        })
    }

    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    pub fn task_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| &t.id == id)
    }

    /// Appends a task built from `draft` and returns a copy of it
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<Task> {
        let id = TaskId::next(self.tasks.iter().map(|t| &t.id), Utc::now());
        let task = Task::from_draft(id, draft)?;
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Removes a task, returning whether it was present
    pub fn remove_task(&mut self, id: &TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| &t.id != id);
        self.tasks.len() != before
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn toggle_star(&mut self) {
        self.starred = !self.starred;
    }

    /// Case-insensitive substring match on the board name
    pub fn matches_name(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}
