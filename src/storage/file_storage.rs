use crate::{
    error::{Result, TaskifyError},
    storage::{is_valid_key, Storage},
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// File-based storage: one JSON file per key under `<project>/.taskify`
pub struct FileStorage {
    root_path: PathBuf,
}

impl FileStorage {
    pub const DATA_DIR: &'static str = ".taskify";

    /// Creates a new FileStorage instance for the given project root
    pub fn new(project_root: impl AsRef<Path>) -> Self {
        Self {
            root_path: project_root.as_ref().join(Self::DATA_DIR),
        }
    }

    /// Directory holding the stored files
    pub fn data_dir(&self) -> &Path {
        &self.root_path
    }

    fn value_file(&self, key: &str) -> Result<PathBuf> {
        if !is_valid_key(key) {
            return Err(TaskifyError::Storage(format!("invalid storage key '{}'", key)));
        }
        Ok(self.root_path.join(format!("{}.json", key)))
    }

    async fn ensure_directory_exists(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            fs::create_dir_all(path).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for FileStorage {
    async fn read(&self, key: &str) -> Result<Option<String>> {
        let file_path = self.value_file(key)?;

        if !file_path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&file_path).await?;
        debug!(path = %file_path.display(), bytes = contents.len(), "read stored value");
        Ok(Some(contents))
    }

    async fn write(&self, key: &str, value: &str) -> Result<()> {
        let file_path = self.value_file(key)?;
        self.ensure_directory_exists(&self.root_path).await?;

        // Replace atomically; the previous value survives a failed write.
        let tmp_path = file_path.with_extension("json.tmp");
        fs::write(&tmp_path, value).await?;
        fs::rename(&tmp_path, &file_path).await?;

        debug!(path = %file_path.display(), bytes = value.len(), "wrote stored value");
        Ok(())
    }
}
