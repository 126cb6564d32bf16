//! The board store: the single owner of the in-memory board collection.
//!
//! Every mutation builds the next collection from a copy, persists it, and
//! only then swaps it in. A failed save leaves the in-memory collection as
//! it was. Each outcome is also recorded as a [`Notice`].

use crate::domain::{Board, BoardId, Task, TaskDraft, TaskId, TaskPatch, TaskStatus};
use crate::error::{Result, TaskifyError};
use crate::notice::{Action, Notice, Notices};
use crate::route::{self, Route, View};
use crate::storage::{self, Storage};
use tracing::info;

pub struct BoardStore<S: Storage> {
    storage: S,
    key: String,
    boards: Vec<Board>,
    notices: Notices,
}

impl<S: Storage> BoardStore<S> {
    /// Loads the collection stored under `key`. Never fails; unreadable
    /// data starts an empty collection.
    pub async fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let boards = storage::load_boards(&storage, &key).await;
        Self {
            storage,
            key,
            boards,
            notices: Notices::default(),
        }
    }

    /// Replaces the notice queue, e.g. to apply a configured interval
    pub fn with_notices(mut self, notices: Notices) -> Self {
        self.notices = notices;
        self
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, id: &BoardId) -> Option<&Board> {
        self.boards.iter().find(|b| &b.id == id)
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub fn resolve(&self, route: &Route) -> View<'_> {
        route::resolve(&self.boards, route)
    }

    /// Persists `next` and makes it the current collection
    async fn commit(&mut self, next: Vec<Board>) -> Result<()> {
        storage::save_boards(&self.storage, &self.key, &next).await?;
        self.boards = next;
        Ok(())
    }

    /// Records the notice for an outcome. `Ok(None)` is a no-op and stays silent.
    fn report<T>(&mut self, result: Result<Option<T>>, action: Action) -> Result<Option<T>> {
        match &result {
            Ok(Some(_)) => self.notices.push(Notice::for_action(action)),
            Ok(None) => {}
            Err(err) => self.notices.push(err.notice()),
        }
        result
    }

    fn report_created<T>(&mut self, result: Result<T>, action: Action) -> Result<T> {
        match &result {
            Ok(_) => self.notices.push(Notice::for_action(action)),
            Err(err) => self.notices.push(err.notice()),
        }
        result
    }

    /// Applies `change` to a copy of one board and commits the result.
    /// `change` returning `None` means nothing changed and nothing is saved.
    async fn change_board<T>(
        &mut self,
        board_id: &BoardId,
        change: impl FnOnce(&mut Board) -> Result<Option<T>>,
    ) -> Result<Option<T>> {
        let mut next = self.boards.clone();
        let Some(outcome) = change(board_mut(&mut next, board_id)?)? else {
            return Ok(None);
        };
        self.commit(next).await?;
        Ok(Some(outcome))
    }

    pub async fn create_board(&mut self, name: &str) -> Result<Board> {
        let result = self.try_create_board(name).await;
        self.report_created(result, Action::BoardCreated)
    }

    async fn try_create_board(&mut self, name: &str) -> Result<Board> {
        let board = Board::new(name)?;
        let mut next = self.boards.clone();
        next.push(board.clone());
        self.commit(next).await?;
        info!(board_id = %board.id, name = %board.name, "created board");
        Ok(board)
    }

    /// Removes a board and all its tasks. Unknown ids are a no-op.
    pub async fn delete_board(&mut self, id: &BoardId) -> Result<()> {
        let result = self.try_delete_board(id).await;
        self.report(result, Action::BoardDeleted).map(|_| ())
    }

    async fn try_delete_board(&mut self, id: &BoardId) -> Result<Option<()>> {
        if self.board(id).is_none() {
            return Ok(None);
        }
        let next: Vec<Board> = self.boards.iter().filter(|b| &b.id != id).cloned().collect();
        self.commit(next).await?;
        info!(board_id = %id, "deleted board");
        Ok(Some(()))
    }

    /// Flips the starred flag; returns the new value, `None` for unknown ids
    pub async fn toggle_star_board(&mut self, id: &BoardId) -> Result<Option<bool>> {
        let result = if self.board(id).is_none() {
            Ok(None)
        } else {
            self.change_board(id, |board| {
                board.toggle_star();
                Ok(Some(board.starred))
            })
            .await
        };
        self.report(result, Action::BoardStarred)
    }

    pub async fn create_task(&mut self, board_id: &BoardId, draft: TaskDraft) -> Result<Task> {
        let result = self.try_create_task(board_id, draft).await;
        self.report_created(result, Action::TaskAdded)
    }

    async fn try_create_task(&mut self, board_id: &BoardId, draft: TaskDraft) -> Result<Task> {
        let mut next = self.boards.clone();
        let task = board_mut(&mut next, board_id)?.add_task(draft)?;
        self.commit(next).await?;
        info!(board_id = %board_id, task_id = %task.id, "created task");
        Ok(task)
    }

    /// Edits a task in place; returns the updated task, `None` for unknown tasks
    pub async fn update_task(
        &mut self,
        board_id: &BoardId,
        task_id: &TaskId,
        patch: TaskPatch,
    ) -> Result<Option<Task>> {
        let result = self
            .change_board(board_id, |board| match board.task_mut(task_id) {
                Some(task) => {
                    task.apply(patch)?;
                    Ok(Some(task.clone()))
                }
                None => Ok(None),
            })
            .await;
        self.report(result, Action::TaskUpdated)
    }

    /// Removes a task. Unknown boards and tasks are a no-op.
    pub async fn delete_task(&mut self, board_id: &BoardId, task_id: &TaskId) -> Result<()> {
        let result = match self.change_board(board_id, |board| {
            Ok(board.remove_task(task_id).then_some(()))
        })
        .await
        {
            Err(TaskifyError::BoardNotFound(_)) => Ok(None),
            other => other,
        };
        self.report(result, Action::TaskDeleted).map(|_| ())
    }

    pub async fn set_task_status(
        &mut self,
        board_id: &BoardId,
        task_id: &TaskId,
        status: TaskStatus,
    ) -> Result<Option<Task>> {
        let result = self
            .change_board(board_id, |board| {
                Ok(board.task_mut(task_id).map(|task| {
                    task.status = status;
                    task.clone()
                }))
            })
            .await;
        self.report(result, Action::TaskStatusChanged)
    }

    pub async fn toggle_star_task(
        &mut self,
        board_id: &BoardId,
        task_id: &TaskId,
    ) -> Result<Option<Task>> {
        let result = self
            .change_board(board_id, |board| {
                Ok(board.task_mut(task_id).map(|task| {
                    task.toggle_star();
                    task.clone()
                }))
            })
            .await;
        self.report(result, Action::TaskStarred)
    }
}

fn board_mut<'a>(boards: &'a mut [Board], id: &BoardId) -> Result<&'a mut Board> {
    boards
        .iter_mut()
        .find(|b| &b.id == id)
        .ok_or_else(|| TaskifyError::BoardNotFound(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        filter_sort_paginate_tasks, DueDate, DueLabel, PageRequest, Priority, TaskFilter,
        TaskSort, Urgency,
    };
    use crate::notice::Severity;
    use crate::storage::{MemoryStorage, DEFAULT_BOARDS_KEY};
    use std::str::FromStr;

    async fn empty_store() -> BoardStore<MemoryStorage> {
        BoardStore::open(MemoryStorage::new(), DEFAULT_BOARDS_KEY).await
    }

    async fn stored(store: &BoardStore<MemoryStorage>) -> Vec<Board> {
        storage::load_boards(store.storage(), DEFAULT_BOARDS_KEY).await
    }

    fn last_notice(store: &mut BoardStore<MemoryStorage>) -> Notice {
        store
            .notices_mut()
            .active(chrono::Utc::now())
            .last()
            .cloned()
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_board_persists() {
        let mut store = empty_store().await;
        let board = store.create_board("Sprint 1").await.unwrap();

        assert_eq!(store.boards(), &[board.clone()]);
        assert_eq!(stored(&store).await, vec![board]);
        assert_eq!(last_notice(&mut store).message, "Board created successfully");
    }

    #[tokio::test]
    async fn test_create_board_rejects_blank_name() {
        let mut store = empty_store().await;
        let err = store.create_board("   ").await.unwrap_err();

        assert!(matches!(err, TaskifyError::Validation(_)));
        assert!(store.boards().is_empty());
        assert_eq!(store.storage().read(DEFAULT_BOARDS_KEY).await.unwrap(), None);

        let notice = last_notice(&mut store);
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Board name cannot be empty");
    }

    #[tokio::test]
    async fn test_create_then_delete_restores_collection() {
        let mut store = empty_store().await;
        store.create_board("Existing").await.unwrap();
        let before = store.boards().to_vec();

        let board = store.create_board("Temporary").await.unwrap();
        store.delete_board(&board.id).await.unwrap();

        assert_eq!(store.boards(), before.as_slice());
        assert_eq!(stored(&store).await, before);
    }

    #[tokio::test]
    async fn test_delete_board_is_idempotent() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();

        store.delete_board(&board.id).await.unwrap();
        store.delete_board(&board.id).await.unwrap();
        store.delete_board(&BoardId::from("never")).await.unwrap();

        assert!(store.boards().is_empty());
    }

    #[tokio::test]
    async fn test_toggle_star_board() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();

        assert_eq!(store.toggle_star_board(&board.id).await.unwrap(), Some(true));
        assert!(stored(&store).await[0].starred);
        assert_eq!(store.toggle_star_board(&board.id).await.unwrap(), Some(false));
        assert_eq!(
            store.toggle_star_board(&BoardId::from("missing")).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn test_blank_task_leaves_board_unchanged() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();
        store.create_task(&board.id, TaskDraft::new("Real")).await.unwrap();
        let before = store.boards().to_vec();

        let err = store
            .create_task(&board.id, TaskDraft::new("  "))
            .await
            .unwrap_err();

        assert!(matches!(err, TaskifyError::Validation(_)));
        assert_eq!(store.boards(), before.as_slice());
        assert_eq!(stored(&store).await, before);
        assert_eq!(last_notice(&mut store).message, "Task description cannot be empty");
    }

    #[tokio::test]
    async fn test_task_on_unknown_board() {
        let mut store = empty_store().await;
        let missing = BoardId::from("missing");

        let err = store
            .create_task(&missing, TaskDraft::new("x"))
            .await
            .unwrap_err();
        assert!(matches!(err, TaskifyError::BoardNotFound(_)));

        store.delete_task(&missing, &TaskId::Numeric(1)).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_task_preserves_position() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();
        store.create_task(&board.id, TaskDraft::new("first")).await.unwrap();
        let second = store.create_task(&board.id, TaskDraft::new("second")).await.unwrap();
        store.create_task(&board.id, TaskDraft::new("third")).await.unwrap();

        let updated = store
            .update_task(
                &board.id,
                &second.id,
                TaskPatch {
                    text: Some("second, edited".to_string()),
                    priority: Some(Priority::Low),
                    ..TaskPatch::default()
                },
            )
            .await
            .unwrap()
            .unwrap();

        let tasks = &store.board(&board.id).unwrap().tasks;
        assert_eq!(tasks[1], updated);
        assert_eq!(tasks[1].text, "second, edited");
        assert_eq!(tasks[1].created_at, second.created_at);
        assert_eq!(last_notice(&mut store).message, "Task updated successfully");
    }

    #[tokio::test]
    async fn test_update_task_rejects_blank_text() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();
        let task = store.create_task(&board.id, TaskDraft::new("keep")).await.unwrap();

        let result = store
            .update_task(
                &board.id,
                &task.id,
                TaskPatch {
                    text: Some(" ".to_string()),
                    ..TaskPatch::default()
                },
            )
            .await;

        assert!(matches!(result, Err(TaskifyError::Validation(_))));
        assert_eq!(store.board(&board.id).unwrap().tasks[0], task);
    }

    #[tokio::test]
    async fn test_unknown_task_is_noop() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();
        let ghost = TaskId::Numeric(404);

        assert_eq!(store.toggle_star_task(&board.id, &ghost).await.unwrap(), None);
        assert_eq!(
            store
                .set_task_status(&board.id, &ghost, TaskStatus::Done)
                .await
                .unwrap(),
            None
        );
        store.delete_task(&board.id, &ghost).await.unwrap();
    }

    #[tokio::test]
    async fn test_unparseable_due_date_survives_unrelated_save() {
        let raw = r#"[{"id":"b1","name":"B","tasks":[{"id":1,"text":"x","dueDate":"soon"}]}]"#;
        let storage = MemoryStorage::with_value(DEFAULT_BOARDS_KEY, raw);
        let mut store = BoardStore::open(storage, DEFAULT_BOARDS_KEY).await;

        let task = &store.board(&BoardId::from("b1")).unwrap().tasks[0];
        let today = chrono::NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let label = DueLabel::for_due(task.due_date.as_ref(), today);
        assert_eq!(label.label, "Invalid date");
        assert_eq!(label.urgency, Urgency::Neutral);

        store.create_board("Other").await.unwrap();

        let persisted = store.storage().read(DEFAULT_BOARDS_KEY).await.unwrap().unwrap();
        assert!(persisted.contains(r#""dueDate":"soon""#));
        assert_eq!(
            stored(&store).await[0].tasks[0].due_date,
            Some(DueDate::Invalid("soon".to_string()))
        );
    }

    #[tokio::test]
    async fn test_failed_save_keeps_memory_state() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();
        let task = store.create_task(&board.id, TaskDraft::new("task")).await.unwrap();
        let before = store.boards().to_vec();

        store.storage().set_read_only(true);

        assert!(matches!(
            store.create_board("Another").await,
            Err(TaskifyError::Storage(_))
        ));
        assert!(store.toggle_star_task(&board.id, &task.id).await.is_err());
        assert!(store.delete_board(&board.id).await.is_err());

        assert_eq!(store.boards(), before.as_slice());
        assert_eq!(stored(&store).await, before);

        let notice = last_notice(&mut store);
        assert_eq!(notice.severity, Severity::Error);
        assert_eq!(notice.message, "Failed to save data");
    }

    #[tokio::test]
    async fn test_reopen_sees_saved_state() {
        let storage = MemoryStorage::new();
        let mut store = BoardStore::open(storage, DEFAULT_BOARDS_KEY).await;
        let board = store.create_board("Board").await.unwrap();
        store.create_task(&board.id, TaskDraft::new("task")).await.unwrap();
        let expected = store.boards().to_vec();

        let BoardStore { storage, .. } = store;
        let reopened = BoardStore::open(storage, DEFAULT_BOARDS_KEY).await;
        assert_eq!(reopened.boards(), expected.as_slice());
    }

    #[tokio::test]
    async fn test_sprint_scenario() {
        let mut store = empty_store().await;
        let board = store.create_board("Sprint 1").await.unwrap();
        let draft = TaskDraft::new("Write docs")
            .with_priority(Priority::from_str("High").unwrap())
            .with_status(TaskStatus::from_str("todo").unwrap());
        let task = store.create_task(&board.id, draft).await.unwrap();

        let done = store
            .set_task_status(&board.id, &task.id, TaskStatus::Done)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(done.status, TaskStatus::Done);
        assert_eq!(
            Task {
                status: TaskStatus::Todo,
                ..done.clone()
            },
            task
        );
        assert_eq!(last_notice(&mut store).message, "Task status updated");

        let filter = TaskFilter {
            status: Some(TaskStatus::Done),
            ..TaskFilter::default()
        };
        let tasks = &store.board(&board.id).unwrap().tasks;
        let found =
            filter_sort_paginate_tasks(tasks, &filter, TaskSort::default(), PageRequest::default());
        assert_eq!(found, vec![done]);
    }

    #[tokio::test]
    async fn test_resolve_routes() {
        let mut store = empty_store().await;
        let board = store.create_board("Board").await.unwrap();

        assert!(matches!(
            store.resolve(&Route::BoardDetail(board.id.clone())),
            View::BoardDetail(b) if b.id == board.id
        ));
        assert!(matches!(
            store.resolve(&Route::BoardDetail(BoardId::from("gone"))),
            View::NotFound { .. }
        ));
    }
}
