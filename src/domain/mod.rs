pub mod board;
pub mod due_date;
pub mod query;
pub mod sorting;
pub mod task;

pub use board::{Board, BoardId};
pub use due_date::{parse_due_date, DueDate, DueLabel, Urgency};
pub use query::{
    board_summary, filter_and_sort_boards, filter_and_sort_tasks, filter_sort_paginate_tasks,
    task_page, BoardSummary, PageRequest, TaskFilter, TaskPage, TaskSort,
};
pub use sorting::{sort_boards, sort_tasks, BoardSortKey, SortOrder, TaskSortField};
pub use task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
