use crate::domain::board::Board;
use crate::domain::task::Task;
use crate::error::TaskifyError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Orderings available on the board list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoardSortKey {
    /// Insertion order
    #[default]
    Recent,
    Name,
    /// Most tasks first
    Tasks,
}

/// Fields available for sorting tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskSortField {
    #[default]
    DueDate,
    Priority,
    #[serde(alias = "created")]
    CreatedAt,
}

/// Sort order direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    fn apply(self, cmp: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    }
}

impl FromStr for BoardSortKey {
    type Err = TaskifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "recent" => Ok(BoardSortKey::Recent),
            "name" => Ok(BoardSortKey::Name),
            "tasks" | "task-count" => Ok(BoardSortKey::Tasks),
            _ => Err(TaskifyError::InvalidSortField(format!(
                "'{}'. Valid fields: recent, name, tasks",
                s
            ))),
        }
    }
}

impl FromStr for TaskSortField {
    type Err = TaskifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "due-date" | "duedate" | "due" => Ok(TaskSortField::DueDate),
            "priority" => Ok(TaskSortField::Priority),
            "created" | "created-at" | "createdat" => Ok(TaskSortField::CreatedAt),
            _ => Err(TaskifyError::InvalidSortField(format!(
                "'{}'. Valid fields: due-date, priority, created",
                s
            ))),
        }
    }
}

impl FromStr for SortOrder {
    type Err = TaskifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            _ => Err(TaskifyError::InvalidSortField(format!(
                "'{}'. Valid orders: asc, desc",
                s
            ))),
        }
    }
}

impl fmt::Display for TaskSortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DueDate => write!(f, "due-date"),
            Self::Priority => write!(f, "priority"),
            Self::CreatedAt => write!(f, "created"),
        }
    }
}

/// Sorts boards in place. All orderings are stable.
pub fn sort_boards(boards: &mut [Board], key: BoardSortKey) {
    match key {
        BoardSortKey::Recent => {}
        BoardSortKey::Name => boards.sort_by(|a, b| compare_names(&a.name, &b.name)),
        BoardSortKey::Tasks => boards.sort_by(|a, b| b.task_count().cmp(&a.task_count())),
    }
}

/// Sorts tasks in place.
///
/// Starred tasks always come before unstarred ones; the chosen field and
/// direction only order tasks with the same starred flag.
///
/// # Examples
/// ```
/// use taskify_core::domain::sorting::{sort_tasks, SortOrder, TaskSortField};
/// use taskify_core::domain::task::{Priority, Task, TaskId};
///
/// let mut low = Task::new(TaskId::Numeric(1), "Low".to_string());
/// low.priority = Priority::Low;
/// let mut high = Task::new(TaskId::Numeric(2), "High".to_string());
/// high.priority = Priority::High;
///
/// let mut tasks = vec![low, high];
/// sort_tasks(&mut tasks, TaskSortField::Priority, SortOrder::Descending);
/// assert_eq!(tasks[0].text, "High");
/// ```
pub fn sort_tasks(tasks: &mut [Task], field: TaskSortField, order: SortOrder) {
    tasks.sort_by(|a, b| {
        b.starred.cmp(&a.starred).then_with(|| match field {
            TaskSortField::DueDate => compare_due_dates(a.due_on(), b.due_on(), order),
            TaskSortField::Priority => order.apply(a.priority.cmp(&b.priority)),
            TaskSortField::CreatedAt => order.apply(a.created_at.cmp(&b.created_at)),
        })
    });
}

/// Case-insensitive name comparison, falling back to the exact text
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Compare optional due dates; a missing date sorts after every real date
/// in both directions.
fn compare_due_dates(a: Option<NaiveDate>, b: Option<NaiveDate>, order: SortOrder) -> Ordering {
    match (a, b) {
        (Some(a_date), Some(b_date)) => order.apply(a_date.cmp(&b_date)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
