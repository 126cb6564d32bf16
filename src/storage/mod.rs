//! Persistence of the board collection.
//!
//! The whole collection is one JSON document stored under a single key in a
//! key-value backend. Loading never fails: unreadable or malformed data is
//! treated as absent and normalized away. Saving reports every failure as
//! [`TaskifyError::Storage`].

use crate::{
    domain::Board,
    error::{Result, TaskifyError},
};
use async_trait::async_trait;
use tracing::{debug, error, warn};

#[cfg(feature = "file-storage")]
pub mod file_storage;
pub mod memory_storage;
pub mod normalize;

#[cfg(feature = "sqlite-storage")]
pub mod sqlite_storage;

#[cfg(feature = "file-storage")]
pub use file_storage::FileStorage;
pub use memory_storage::MemoryStorage;

#[cfg(feature = "sqlite-storage")]
pub use sqlite_storage::SqliteStorage;

/// Key the board collection is stored under unless configured otherwise
pub const DEFAULT_BOARDS_KEY: &str = "boards";

/// Whether `key` can name a stored value in every backend: non-empty
/// ASCII letters, digits, `-` and `_`
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Key-value backend holding serialized state
#[async_trait]
pub trait Storage: Send + Sync {
    /// Reads the value stored under `key`, `None` if nothing is stored
    async fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replaces the value stored under `key`
    async fn write(&self, key: &str, value: &str) -> Result<()>;
}

/// Loads and normalizes the board collection. Never fails.
pub async fn load_boards(storage: &dyn Storage, key: &str) -> Vec<Board> {
    match storage.read(key).await {
        Ok(Some(text)) => {
            let boards = normalize::parse_boards(&text);
            debug!(key, boards = boards.len(), "loaded board collection");
            boards
        }
        Ok(None) => {
            debug!(key, "no stored board collection");
            Vec::new()
        }
        Err(err) => {
            warn!(key, error = %err, "failed to read board collection, starting empty");
            Vec::new()
        }
    }
}

/// Serializes and writes the full board collection
pub async fn save_boards(storage: &dyn Storage, key: &str, boards: &[Board]) -> Result<()> {
    let json = serde_json::to_string(boards).map_err(|e| TaskifyError::Storage(e.to_string()))?;

    storage.write(key, &json).await.map_err(|err| {
        error!(key, error = %err, "failed to save board collection");
        match err {
            TaskifyError::Storage(message) => TaskifyError::Storage(message),
            other => TaskifyError::Storage(other.to_string()),
        }
    })?;

    debug!(key, boards = boards.len(), bytes = json.len(), "saved board collection");
    Ok(())
}
