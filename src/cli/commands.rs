use crate::domain::{BoardSortKey, Priority, TaskId, TaskSortField, TaskStatus};
use chrono::NaiveDate;
use clap::builder::RangedU64ValueParser;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "taskify", about = "Local task boards", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different project directory
    #[arg(short = 'C', long = "project-dir", global = true)]
    pub project_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List boards with total counts
    Boards(BoardsArgs),
    /// Create, delete or star a board
    Board(BoardCmd),
    /// Show the tasks of a board
    Show(ShowArgs),
    /// Add, edit, delete or star tasks
    Task(TaskCmd),
    /// Render the view at a path: `/` or `/board/<ID>`
    Open(OpenArgs),
}

#[derive(Args)]
pub struct BoardsArgs {
    /// Only boards whose name contains this text
    #[arg(long, short)]
    pub search: Option<String>,

    /// recent, name or tasks
    #[arg(long, default_value = "recent")]
    pub sort: BoardSortKey,
}

#[derive(Args)]
pub struct BoardCmd {
    #[command(subcommand)]
    pub action: BoardAction,
}

#[derive(Subcommand)]
pub enum BoardAction {
    /// Create a board
    New { name: String },
    /// Delete a board and all of its tasks
    Rm { id: String },
    /// Star or unstar a board
    Star { id: String },
}

#[derive(Args)]
pub struct ShowArgs {
    pub board: String,

    #[command(flatten)]
    pub query: TaskQueryArgs,
}

#[derive(Args)]
pub struct TaskQueryArgs {
    /// Only tasks whose text contains this text
    #[arg(long, short)]
    pub search: Option<String>,

    /// Only tasks with this status
    #[arg(long)]
    pub status: Option<TaskStatus>,

    /// Only tasks with this priority
    #[arg(long)]
    pub priority: Option<Priority>,

    /// due-date, priority or created
    #[arg(long)]
    pub sort: Option<TaskSortField>,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page, at least 1
    #[arg(long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub page_size: Option<usize>,
}

#[derive(Args)]
pub struct TaskCmd {
    #[command(subcommand)]
    pub action: TaskAction,
}

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task to a board
    Add(AddArgs),
    /// Edit a task
    Edit(EditArgs),
    /// Delete a task
    Rm { board: String, task: TaskId },
    /// Star or unstar a task
    Star { board: String, task: TaskId },
    /// Change a task's status
    Status {
        board: String,
        task: TaskId,
        status: TaskStatus,
    },
}

#[derive(Args)]
pub struct AddArgs {
    pub board: String,
    pub text: String,

    #[arg(long, default_value = "todo")]
    pub status: TaskStatus,

    #[arg(long, default_value = "medium")]
    pub priority: Priority,

    /// Due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "quick")]
    pub due: Option<NaiveDate>,

    /// Due three days from today
    #[arg(long)]
    pub quick: bool,
}

#[derive(Args)]
pub struct EditArgs {
    pub board: String,
    pub task: TaskId,

    #[arg(long)]
    pub text: Option<String>,

    #[arg(long)]
    pub status: Option<TaskStatus>,

    #[arg(long)]
    pub priority: Option<Priority>,

    /// Due date (YYYY-MM-DD)
    #[arg(long, conflicts_with = "clear_due")]
    pub due: Option<NaiveDate>,

    /// Remove the due date
    #[arg(long)]
    pub clear_due: bool,
}

#[derive(Args)]
pub struct OpenArgs {
    pub path: String,

    #[command(flatten)]
    pub query: TaskQueryArgs,
}
