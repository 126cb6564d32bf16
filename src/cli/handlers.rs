use anyhow::Context;
use chrono::{Local, NaiveDate, Utc};
use serde::Serialize;
use std::path::Path;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::config::TaskifyConfig;
use crate::domain::{
    board_summary, filter_and_sort_boards, task_page, Board, BoardId, PageRequest, SortOrder,
    TaskDraft, TaskFilter, TaskPatch, TaskSort,
};
use crate::notice::Notices;
use crate::route::{Route, View};
use crate::storage::FileStorage;
use crate::store::BoardStore;

/// Exit code for views of a board that does not exist
pub const EXIT_NOT_FOUND: i32 = 2;

type Store = BoardStore<FileStorage>;

/// Runs one command and returns the process exit code
pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let json = cli.json;
    let project_dir = cli.project_dir.unwrap_or_else(|| ".".into());
    let (mut store, config) = open_store(&project_dir).await?;

    match cli.command {
        Commands::Boards(args) => cmd_boards(&store, args, json),
        Commands::Board(cmd) => cmd_board(&mut store, cmd.action, json).await,
        Commands::Show(args) => {
            cmd_show(&store, &config, &BoardId::from(args.board), args.query, json)
        }
        Commands::Task(cmd) => cmd_task(&mut store, cmd.action, json).await,
        Commands::Open(args) => cmd_open(&store, &config, &args.path, args.query, json),
    }
}

async fn open_store(project_dir: &Path) -> anyhow::Result<(Store, TaskifyConfig)> {
    let storage = FileStorage::new(project_dir);
    let config = TaskifyConfig::load_from_dir(storage.data_dir())
        .with_context(|| format!("loading config from {}", storage.data_dir().display()))?;
    let store = BoardStore::open(storage, config.storage_key.clone())
        .await
        .with_notices(Notices::new(config.notice_ttl()));
    Ok((store, config))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints the notices raised by the last mutation
fn flush_notices(store: &mut Store, json: bool) {
    if !json {
        print_notices(store.notices_mut().active(Utc::now()));
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_boards(store: &Store, args: BoardsArgs, json: bool) -> anyhow::Result<i32> {
    let search = args.search.unwrap_or_default();
    let boards = filter_and_sort_boards(store.boards(), &search, args.sort);
    render_board_list(store.boards(), &boards, json)?;
    Ok(0)
}

fn render_board_list(all: &[Board], shown: &[Board], json: bool) -> anyhow::Result<()> {
    let summary = board_summary(all);
    if json {
        return print_json(&board_list_json(summary, shown));
    }

    println!("{}", format_summary(&summary));
    if shown.is_empty() {
        println!("(no boards)");
    }
    for board in shown {
        println!("{}", format_board_row(board));
    }
    Ok(())
}

fn cmd_show(
    store: &Store,
    config: &TaskifyConfig,
    id: &BoardId,
    query: TaskQueryArgs,
    json: bool,
) -> anyhow::Result<i32> {
    match store.board(id) {
        Some(board) => {
            render_board(board, config, query, json)?;
            Ok(0)
        }
        None => {
            render_not_found(id, &Route::BoardList, json)?;
            Ok(EXIT_NOT_FOUND)
        }
    }
}

fn cmd_open(
    store: &Store,
    config: &TaskifyConfig,
    path: &str,
    query: TaskQueryArgs,
    json: bool,
) -> anyhow::Result<i32> {
    let route: Route = path.parse()?;
    match store.resolve(&route) {
        View::BoardList(boards) => {
            let shown = filter_and_sort_boards(boards, "", Default::default());
            render_board_list(boards, &shown, json)?;
            Ok(0)
        }
        View::BoardDetail(board) => {
            render_board(board, config, query, json)?;
            Ok(0)
        }
        View::NotFound { requested, back } => {
            render_not_found(&requested, &back, json)?;
            Ok(EXIT_NOT_FOUND)
        }
    }
}

fn task_query(query: TaskQueryArgs, config: &TaskifyConfig) -> (TaskFilter, TaskSort, PageRequest) {
    let filter = TaskFilter {
        search: query.search.unwrap_or_default(),
        status: query.status,
        priority: query.priority,
    };
    let sort = TaskSort {
        field: query.sort.unwrap_or(config.default_sort),
        order: if query.desc {
            SortOrder::Descending
        } else {
            SortOrder::Ascending
        },
    };
    let page = PageRequest::new(
        query.page.saturating_sub(1),
        query.page_size.unwrap_or(config.page_size),
    );
    (filter, sort, page)
}

fn render_board(
    board: &Board,
    config: &TaskifyConfig,
    query: TaskQueryArgs,
    json: bool,
) -> anyhow::Result<()> {
    let (filter, sort, page) = task_query(query, config);
    let page = task_page(&board.tasks, &filter, sort, page);
    let today = today();

    if json {
        return print_json(&board_detail_json(board, &page, today));
    }

    let star = if board.starred { " *" } else { "" };
    println!("{}{}  ({})", board.name, star, board.id);
    if page.items.is_empty() {
        println!("(no tasks)");
    }
    for task in &page.items {
        println!("{}", format_task_row(task, today));
    }
    println!("{}", format_pager(&page));
    Ok(())
}

fn render_not_found(requested: &BoardId, back: &Route, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(&not_found_json(requested.as_str(), back));
    }
    eprintln!("{}", format_not_found(requested.as_str(), back));
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

async fn cmd_board(store: &mut Store, action: BoardAction, json: bool) -> anyhow::Result<i32> {
    match action {
        BoardAction::New { name } => {
            let board = store.create_board(&name).await?;
            if json {
                print_json(&board_header(&board))?;
            } else {
                println!("{}", board.id);
            }
        }
        BoardAction::Rm { id } => {
            store.delete_board(&BoardId::from(id)).await?;
        }
        BoardAction::Star { id } => {
            let starred = store.toggle_star_board(&BoardId::from(id)).await?;
            if json {
                print_json(&starred)?;
            }
        }
    }
    flush_notices(store, json);
    Ok(0)
}

async fn cmd_task(store: &mut Store, action: TaskAction, json: bool) -> anyhow::Result<i32> {
    let changed = match action {
        TaskAction::Add(args) => {
            let draft = match (args.quick, args.due) {
                (true, _) => TaskDraft::quick(args.text, today()),
                (false, Some(due)) => TaskDraft::new(args.text).with_due_date(due),
                (false, None) => TaskDraft::new(args.text),
            }
            .with_status(args.status)
            .with_priority(args.priority);

            let task = store.create_task(&BoardId::from(args.board), draft).await?;
            if !json {
                println!("{}", task.id);
            }
            Some(task)
        }
        TaskAction::Edit(args) => {
            let due_date = if args.clear_due {
                Some(None)
            } else {
                args.due.map(Some)
            };
            let patch = TaskPatch {
                text: args.text,
                status: args.status,
                priority: args.priority,
                due_date,
            };
            if patch.is_empty() {
                anyhow::bail!("nothing to change: pass --text, --status, --priority, --due or --clear-due");
            }
            store
                .update_task(&BoardId::from(args.board), &args.task, patch)
                .await?
        }
        TaskAction::Rm { board, task } => {
            store.delete_task(&BoardId::from(board), &task).await?;
            None
        }
        TaskAction::Star { board, task } => {
            store.toggle_star_task(&BoardId::from(board), &task).await?
        }
        TaskAction::Status {
            board,
            task,
            status,
        } => {
            store
                .set_task_status(&BoardId::from(board), &task, status)
                .await?
        }
    };

    if json {
        if let Some(task) = &changed {
            print_json(task)?;
        }
    }
    flush_notices(store, json);
    Ok(0)
}
