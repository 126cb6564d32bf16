//! Load-boundary normalization of persisted board data.
//!
//! Stored data may come from older versions or have been edited by hand,
//! so it is read as untyped JSON and mapped onto the domain types here,
//! once, with these defaults:
//!
//! | Record | Field       | Missing / malformed           | Result         |
//! |--------|-------------|-------------------------------|----------------|
//! | Board  | `id`        | missing, empty or duplicate   | board dropped  |
//! | Board  | `name`      | missing or blank              | board dropped  |
//! | Board  | `starred`   | missing or not a bool         | `false`        |
//! | Board  | `createdAt` | missing or unparseable        | now            |
//! | Board  | `tasks`     | missing or not an array       | empty          |
//! | Task   | `id`        | missing or duplicate in board | fresh id       |
//! | Task   | `text`      | missing or blank              | task dropped   |
//! | Task   | `status`    | missing or unknown            | `todo`         |
//! | Task   | `priority`  | missing or unknown            | `medium`       |
//! | Task   | `dueDate`   | missing or empty              | absent         |
//! | Task   | `dueDate`   | unparseable text              | kept verbatim  |
//! | Task   | `starred`   | missing or not a bool         | `false`        |
//! | Task   | `createdAt` | missing or unparseable        | now            |

use crate::domain::{Board, BoardId, DueDate, Priority, Task, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::str::FromStr;
use tracing::warn;

/// Parses stored text into boards, dropping anything unusable
pub fn parse_boards(text: &str) -> Vec<Board> {
    let value: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(err) => {
            warn!(error = %err, "stored board collection is not valid JSON, ignoring it");
            return Vec::new();
        }
    };
    normalize_boards(value, Utc::now())
}

/// Maps an untyped board collection onto boards, applying the default table
pub fn normalize_boards(value: Value, now: DateTime<Utc>) -> Vec<Board> {
    let Value::Array(raw_boards) = value else {
        warn!("stored board collection is not an array, ignoring it");
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut boards = Vec::with_capacity(raw_boards.len());

    for (index, raw) in raw_boards.into_iter().enumerate() {
        let Value::Object(record) = raw else {
            warn!(index, "dropping board record that is not an object");
            continue;
        };
        let Some(board) = normalize_board(record, now) else {
            warn!(index, "dropping board record without id or name");
            continue;
        };
        if !seen.insert(board.id.clone()) {
            warn!(index, board_id = %board.id, "dropping board with duplicate id");
            continue;
        }
        boards.push(board);
    }

    boards
}

fn normalize_board(mut record: Map<String, Value>, now: DateTime<Utc>) -> Option<Board> {
    let id = match record.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => BoardId::from(s.as_str()),
        Some(Value::Number(n)) => BoardId::from(n.to_string()),
        _ => return None,
    };
    let name = match record.get("name") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return None,
    };

    let tasks = match record.remove("tasks") {
        Some(Value::Array(raw_tasks)) => normalize_tasks(&id, raw_tasks, now),
        _ => Vec::new(),
    };

    Some(Board {
        id,
        name,
        starred: bool_field(&record, "starred"),
        created_at: timestamp_field(&record, "createdAt").unwrap_or(now),
        tasks,
    })
}

fn normalize_tasks(board_id: &BoardId, raw_tasks: Vec<Value>, now: DateTime<Utc>) -> Vec<Task> {
    let mut tasks: Vec<Task> = Vec::with_capacity(raw_tasks.len());
    let mut seen = HashSet::new();
    let mut needs_id = Vec::new();

    for raw in raw_tasks {
        let Value::Object(record) = raw else {
            warn!(board_id = %board_id, "dropping task record that is not an object");
            continue;
        };
        let Some((id, task)) = normalize_task(board_id, &record, now) else {
            warn!(board_id = %board_id, "dropping task without text");
            continue;
        };
        match id {
            Some(id) if seen.insert(id.clone()) => tasks.push(Task { id, ..task }),
            _ => {
                needs_id.push(tasks.len());
                tasks.push(task);
            }
        }
    }

    for index in needs_id {
        let id = TaskId::next(
            tasks
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != index)
                .map(|(_, t)| &t.id),
            now,
        );
        tasks[index].id = id;
    }

    tasks
}

/// Returns the stored id (if usable) and the task with a placeholder id
fn normalize_task(
    board_id: &BoardId,
    record: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Option<(Option<TaskId>, Task)> {
    let text = match record.get("text") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
        _ => return None,
    };

    let id = match record.get("id") {
        Some(Value::Number(n)) => Some(
            n.as_u64()
                .map(TaskId::Numeric)
                .unwrap_or_else(|| TaskId::Text(n.to_string())),
        ),
        Some(Value::String(s)) if !s.trim().is_empty() => Some(TaskId::Text(s.clone())),
        _ => None,
    };

    let status = str_field(record, "status")
        .and_then(|s| TaskStatus::from_str(s).ok())
        .unwrap_or_default();
    let priority = str_field(record, "priority")
        .and_then(|s| Priority::from_str(s).ok())
        .unwrap_or_default();

    let due_date = match str_field(record, "dueDate") {
        None => None,
        Some(raw) if raw.trim().is_empty() => None,
        Some(raw) => {
            let due = DueDate::parse(raw);
            if due.date().is_none() {
                warn!(board_id = %board_id, due_date = raw, "keeping unparseable due date as text");
            }
            Some(due)
        }
    };

    let task = Task {
        id: TaskId::Numeric(0),
        text,
        status,
        priority,
        due_date,
        starred: bool_field(record, "starred"),
        created_at: timestamp_field(record, "createdAt").unwrap_or(now),
    };
    Some((id, task))
}

fn str_field<'a>(record: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

fn bool_field(record: &Map<String, Value>, key: &str) -> bool {
    record.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn timestamp_field(record: &Map<String, Value>, key: &str) -> Option<DateTime<Utc>> {
    str_field(record, key)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}
