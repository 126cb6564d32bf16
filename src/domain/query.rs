//! Derived views over board and task snapshots.
//!
//! Everything here is a pure projection: inputs are borrowed, outputs are
//! fresh vectors, and nothing is cached between calls.

use crate::domain::board::Board;
use crate::domain::sorting::{sort_boards, sort_tasks, BoardSortKey, SortOrder, TaskSortField};
use crate::domain::task::{Priority, Task, TaskStatus};
use serde::Serialize;

/// Search and filter criteria for the task table
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskFilter {
    pub search: String,
    /// `None` means all statuses
    pub status: Option<TaskStatus>,
    /// `None` means all priorities
    pub priority: Option<Priority>,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        task.matches_text(&self.search)
            && self.status.map_or(true, |s| task.status == s)
            && self.priority.map_or(true, |p| task.priority == p)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSort {
    pub field: TaskSortField,
    pub order: SortOrder,
}

/// Zero-based page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: usize = 4;

    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Slice bounds for this page within `len` items
    fn bounds(&self, len: usize) -> (usize, usize) {
        let start = self.page.saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        (start, end)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_PAGE_SIZE)
    }
}

/// One page of the task table together with the totals a pager needs
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPage {
    pub items: Vec<Task>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

impl TaskPage {
    pub fn page_count(&self) -> usize {
        if self.page_size == 0 {
            return 0;
        }
        self.total.div_ceil(self.page_size)
    }
}

/// Aggregate counts shown on the board list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub total_boards: usize,
    pub total_tasks: usize,
    pub starred_boards: usize,
}

pub fn board_summary(boards: &[Board]) -> BoardSummary {
    BoardSummary {
        total_boards: boards.len(),
        total_tasks: boards.iter().map(Board::task_count).sum(),
        starred_boards: boards.iter().filter(|b| b.starred).count(),
    }
}

/// Boards whose name contains `search` (case-insensitive), in `key` order
pub fn filter_and_sort_boards(boards: &[Board], search: &str, key: BoardSortKey) -> Vec<Board> {
    let mut result: Vec<Board> = boards
        .iter()
        .filter(|b| b.matches_name(search))
        .cloned()
        .collect();
    sort_boards(&mut result, key);
    result
}

/// Filtered and sorted tasks, before pagination
pub fn filter_and_sort_tasks(tasks: &[Task], filter: &TaskFilter, sort: TaskSort) -> Vec<Task> {
    let mut result: Vec<Task> = tasks.iter().filter(|t| filter.matches(t)).cloned().collect();
    sort_tasks(&mut result, sort.field, sort.order);
    result
}

/// Filter, sort, then take one page. Pages past the end are empty.
pub fn filter_sort_paginate_tasks(
    tasks: &[Task],
    filter: &TaskFilter,
    sort: TaskSort,
    page: PageRequest,
) -> Vec<Task> {
    task_page(tasks, filter, sort, page).items
}

pub fn task_page(tasks: &[Task], filter: &TaskFilter, sort: TaskSort, page: PageRequest) -> TaskPage {
    let mut sorted = filter_and_sort_tasks(tasks, filter, sort);
    let total = sorted.len();
    let (start, end) = page.bounds(total);
    let items = sorted.drain(start..end).collect();
    TaskPage {
        items,
        total,
        page: page.page,
        page_size: page.page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::task::{TaskDraft, TaskId};
    use chrono::{Duration, NaiveDate, Utc};

    fn sample_tasks() -> Vec<Task> {
        let now = Utc::now();
        let base = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        (0..11u64)
            .map(|i| {
                let mut t = Task::new(TaskId::Numeric(i), format!("Task {}", i));
                t.status = TaskStatus::ALL[(i % 3) as usize];
                t.priority = Priority::ALL[(i % 3) as usize];
                t.starred = i % 4 == 0;
                t.created_at = now - Duration::minutes(i as i64);
                if i % 3 != 0 {
                    t.due_date = Some((base + Duration::days((i * 7 % 5) as i64)).into());
                }
                t
            })
            .collect()
    }

    fn ids(tasks: &[Task]) -> Vec<TaskId> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_filter_and_sort_boards_search_and_no_mutation() {
        let boards = vec![
            Board::new("Sprint 2").unwrap(),
            Board::new("Groceries").unwrap(),
            Board::new("sprint 1").unwrap(),
        ];
        let before = boards.clone();

        let result = filter_and_sort_boards(&boards, "SPRINT", BoardSortKey::Name);
        let names: Vec<_> = result.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["sprint 1", "Sprint 2"]);
        assert_eq!(boards, before);
    }

    #[test]
    fn test_name_sort_is_non_decreasing() {
        let boards: Vec<Board> = ["delta", "Alpha", "charlie", "Bravo", "alpha"]
            .iter()
            .map(|n| Board::new(n).unwrap())
            .collect();

        let result = filter_and_sort_boards(&boards, "", BoardSortKey::Name);
        assert!(result
            .windows(2)
            .all(|w| w[0].name.to_lowercase() <= w[1].name.to_lowercase()));
        assert_eq!(result.len(), boards.len());
    }

    #[test]
    fn test_board_summary() {
        let mut a = Board::new("A").unwrap();
        a.add_task(TaskDraft::new("one")).unwrap();
        a.add_task(TaskDraft::new("two")).unwrap();
        let mut b = Board::new("B").unwrap();
        b.starred = true;
        b.add_task(TaskDraft::new("three")).unwrap();

        let summary = board_summary(&[a, b]);
        assert_eq!(
            summary,
            BoardSummary {
                total_boards: 2,
                total_tasks: 3,
                starred_boards: 1,
            }
        );
    }

    #[test]
    fn test_filter_by_text_status_and_priority() {
        let tasks = sample_tasks();

        let filter = TaskFilter {
            search: "task 1".to_string(),
            ..TaskFilter::default()
        };
        let found = filter_and_sort_tasks(&tasks, &filter, TaskSort::default());
        let mut texts: Vec<_> = found.iter().map(|t| t.text.clone()).collect();
        texts.sort();
        assert_eq!(texts, vec!["Task 1", "Task 10"]);

        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            priority: Some(Priority::High),
            ..TaskFilter::default()
        };
        let found = filter_and_sort_tasks(&tasks, &filter, TaskSort::default());
        assert!(!found.is_empty());
        assert!(found
            .iter()
            .all(|t| t.status == TaskStatus::Done && t.priority == Priority::High));
    }

    #[test]
    fn test_pages_reconstruct_full_list() {
        let tasks = sample_tasks();
        let filter = TaskFilter::default();

        for field in [
            TaskSortField::DueDate,
            TaskSortField::Priority,
            TaskSortField::CreatedAt,
        ] {
            for order in [SortOrder::Ascending, SortOrder::Descending] {
                let sort = TaskSort { field, order };
                let full = filter_and_sort_tasks(&tasks, &filter, sort);

                for page_size in 1..=5 {
                    let mut collected = Vec::new();
                    let mut page = 0;
                    loop {
                        let items = filter_sort_paginate_tasks(
                            &tasks,
                            &filter,
                            sort,
                            PageRequest::new(page, page_size),
                        );
                        if items.is_empty() {
                            break;
                        }
                        assert!(items.len() <= page_size);
                        collected.extend(items);
                        page += 1;
                    }
                    assert_eq!(ids(&collected), ids(&full));
                }
            }
        }
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let tasks = sample_tasks();
        let page = task_page(
            &tasks,
            &TaskFilter::default(),
            TaskSort::default(),
            PageRequest::new(99, 4),
        );
        assert!(page.items.is_empty());
        assert_eq!(page.total, tasks.len());
        assert_eq!(page.page_count(), 3);

        let huge = filter_sort_paginate_tasks(
            &tasks,
            &TaskFilter::default(),
            TaskSort::default(),
            PageRequest::new(usize::MAX, usize::MAX),
        );
        assert!(huge.is_empty());
    }

    #[test]
    fn test_zero_page_size() {
        let tasks = sample_tasks();
        let page = task_page(
            &tasks,
            &TaskFilter::default(),
            TaskSort::default(),
            PageRequest::new(0, 0),
        );
        assert!(page.items.is_empty());
        assert_eq!(page.page_count(), 0);
    }

    #[test]
    fn test_starred_precede_unstarred_after_pagination() {
        let tasks = sample_tasks();
        let sort = TaskSort {
            field: TaskSortField::Priority,
            order: SortOrder::Descending,
        };
        let first = filter_sort_paginate_tasks(&tasks, &TaskFilter::default(), sort, PageRequest::new(0, 3));
        assert!(first.iter().all(|t| t.starred));
    }
}
