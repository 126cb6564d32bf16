//! # Taskify Core
//!
//! State model, persistence and derived views for Taskify task boards.
//!
//! Boards own ordered lists of tasks. The whole collection lives in one
//! JSON document under a single storage key and is rewritten on every
//! change through [`BoardStore`]. Filtering, sorting and pagination are
//! pure functions over snapshots, in [`domain::query`].

#[cfg(feature = "file-storage")]
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod notice;
pub mod route;
pub mod storage;
pub mod store;

// Re-export commonly used types
pub use config::TaskifyConfig;
pub use domain::{
    board::{Board, BoardId},
    task::{Priority, Task, TaskDraft, TaskId, TaskPatch, TaskStatus},
};
pub use error::{Result, TaskifyError};
pub use notice::{Notice, Notices, Severity};
pub use route::{Route, View};
pub use storage::Storage;
pub use store::BoardStore;
