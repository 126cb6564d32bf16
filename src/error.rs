use crate::notice::{Notice, Severity};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, TaskifyError>;

#[derive(Debug, Error)]
pub enum TaskifyError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Board not found: {0}")]
    BoardNotFound(String),

    #[error("Invalid task ID: {0}")]
    InvalidTaskId(String),

    #[error("Invalid task status '{0}'. Valid statuses: todo, in-progress, done")]
    InvalidStatus(String),

    #[error("Invalid priority '{0}'. Valid priorities: low, medium, high")]
    InvalidPriority(String),

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    #[error("Invalid route: {0}")]
    InvalidRoute(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TaskifyError {
    /// Maps the error to the notice shown to the user.
    ///
    /// Validation errors carry their own message; every failure to persist
    /// collapses into the generic save notice.
    pub fn notice(&self) -> Notice {
        match self {
            Self::Validation(message) => Notice::new(Severity::Error, message.clone()),
            Self::Storage(_) | Self::IoError(_) | Self::SerializationError(_) => {
                Notice::new(Severity::Error, Notice::SAVE_FAILED)
            }
            other => Notice::new(Severity::Error, other.to_string()),
        }
    }

    /// Process exit code used by the command line front end
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::BoardNotFound(_) => 2,
            _ => 1,
        }
    }
}
