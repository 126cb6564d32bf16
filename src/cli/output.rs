use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{Board, BoardSummary, DueLabel, Task, TaskPage};
use crate::notice::{Notice, Severity};
use crate::route::Route;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardRowJson<'a> {
    #[serde(flatten)]
    pub board: BoardHeaderJson<'a>,
    pub task_count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardHeaderJson<'a> {
    pub id: &'a str,
    pub name: &'a str,
    pub starred: bool,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct BoardListJson<'a> {
    pub summary: BoardSummary,
    pub boards: Vec<BoardRowJson<'a>>,
}

#[derive(Serialize)]
pub struct TaskRowJson<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub due: DueLabel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDetailJson<'a> {
    pub board: BoardHeaderJson<'a>,
    pub tasks: Vec<TaskRowJson<'a>>,
    pub total: usize,
    pub page: usize,
    pub page_count: usize,
}

#[derive(Serialize)]
pub struct NotFoundJson {
    pub error: &'static str,
    pub requested: String,
    pub back: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn board_header(board: &Board) -> BoardHeaderJson<'_> {
    BoardHeaderJson {
        id: board.id.as_str(),
        name: &board.name,
        starred: board.starred,
        created_at: board.created_at.to_rfc3339(),
    }
}

pub fn board_list_json(summary: BoardSummary, boards: &[Board]) -> BoardListJson<'_> {
    BoardListJson {
        summary,
        boards: boards
            .iter()
            .map(|b| BoardRowJson {
                board: board_header(b),
                task_count: b.task_count(),
            })
            .collect(),
    }
}

/// Page numbers in the output are 1-based
pub fn board_detail_json<'a>(board: &'a Board, page: &'a TaskPage, today: NaiveDate) -> BoardDetailJson<'a> {
    BoardDetailJson {
        board: board_header(board),
        tasks: page
            .items
            .iter()
            .map(|task| TaskRowJson {
                task,
                due: DueLabel::for_due(task.due_date.as_ref(), today),
            })
            .collect(),
        total: page.total,
        page: page.page + 1,
        page_count: page.page_count(),
    }
}

pub fn not_found_json(requested: &str, back: &Route) -> NotFoundJson {
    NotFoundJson {
        error: "Board not found",
        requested: requested.to_string(),
        back: back.path(),
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

fn star(starred: bool) -> &'static str {
    if starred {
        "*"
    } else {
        " "
    }
}

pub fn format_summary(summary: &BoardSummary) -> String {
    format!(
        "{} boards, {} tasks, {} starred",
        summary.total_boards, summary.total_tasks, summary.starred_boards
    )
}

pub fn format_board_row(board: &Board) -> String {
    let count = board.task_count();
    format!(
        "{} {}  {}  ({} {})",
        star(board.starred),
        board.id,
        board.name,
        count,
        if count == 1 { "task" } else { "tasks" }
    )
}

pub fn format_task_row(task: &Task, today: NaiveDate) -> String {
    let due = DueLabel::for_due(task.due_date.as_ref(), today);
    format!(
        "{} {:<15} [{}] {:<6} {:<11} {}",
        star(task.starred),
        task.id.to_string(),
        task.status.to_string(),
        task.priority.to_string(),
        due.label,
        task.text
    )
}

pub fn format_pager(page: &TaskPage) -> String {
    format!(
        "page {} of {} ({} {})",
        page.page + 1,
        page.page_count().max(1),
        page.total,
        if page.total == 1 { "task" } else { "tasks" }
    )
}

pub fn format_not_found(requested: &str, back: &Route) -> String {
    format!("Board not found: {}\nBack to boards: {}", requested, back)
}

/// Prints notices: successes and info to stdout, errors to stderr
pub fn print_notices<'a>(notices: impl IntoIterator<Item = &'a Notice>) {
    for notice in notices {
        match notice.severity {
            Severity::Error => eprintln!("{}", notice),
            Severity::Success | Severity::Info => println!("{}", notice),
        }
    }
}
