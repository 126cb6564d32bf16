use crate::domain::TaskSortField;
use crate::error::{Result, TaskifyError};
use crate::notice::Notices;
use crate::storage::{is_valid_key, DEFAULT_BOARDS_KEY};
use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Project configuration, read from `.taskify/config.toml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskifyConfig {
    /// Storage key holding the board collection
    pub storage_key: String,
    /// Rows per page in the board detail view
    pub page_size: usize,
    /// Seconds before a notice is dismissed
    pub notice_ttl_secs: i64,
    /// Sort field used when none is requested
    pub default_sort: TaskSortField,
}

impl Default for TaskifyConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_BOARDS_KEY.to_string(),
            page_size: crate::domain::PageRequest::DEFAULT_PAGE_SIZE,
            notice_ttl_secs: Notices::DEFAULT_TTL_SECS,
            default_sort: TaskSortField::DueDate,
        }
    }
}

impl TaskifyConfig {
    pub const FILE_NAME: &'static str = "config.toml";

    /// Loads `config.toml` from a data directory, falling back to defaults
    /// when the file does not exist
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(Self::FILE_NAME);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        let config: TaskifyConfig = toml::from_str(&content)
            .map_err(|e| TaskifyError::ConfigError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !is_valid_key(&self.storage_key) {
            return Err(TaskifyError::ConfigError(format!(
                "storage_key '{}' must be non-empty and use only letters, digits, '-' and '_'",
                self.storage_key
            )));
        }
        if self.page_size == 0 {
            return Err(TaskifyError::ConfigError(
                "page_size must be at least 1".to_string(),
            ));
        }
        if self.notice_ttl_secs < 0 {
            return Err(TaskifyError::ConfigError(
                "notice_ttl_secs must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    pub fn notice_ttl(&self) -> Duration {
        Duration::seconds(self.notice_ttl_secs)
    }
}
