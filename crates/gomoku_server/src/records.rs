//! Record directory: listing, reading and writing game records.

use crate::error::ServerError;
use gomoku_engine::{GameRecord, RecordId};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Record store backed by a directory of JSON files.
#[derive(Debug, Clone)]
pub struct RecordDir {
    root: PathBuf,
}

impl RecordDir {
    /// Uses `root` as the record directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory holding the records.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// File names in the directory, oldest first.
    #[instrument(skip(self), fields(root = %self.root.display()))]
    pub async fn list(&self) -> Result<Vec<RecordId>, ServerError> {
        let mut entries = tokio::fs::read_dir(&self.root)
            .await
            .map_err(|e| ServerError::Internal(format!("cannot read record directory: {}", e)))?;

        let mut ids = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| ServerError::Internal(format!("cannot read record directory: {}", e)))?
        {
            let is_file = entry.file_type().await.map(|t| t.is_file()).unwrap_or(false);
            let file_name = entry.file_name();
            if let (true, Some(name)) = (is_file, file_name.to_str()) {
                ids.push(RecordId::from(name));
            }
        }
        ids.sort_by_cached_key(|id| (id.recorded_at(), id.collision_index(), id.clone()));
        debug!(count = ids.len(), "Listed records");
        Ok(ids)
    }

    /// Raw JSON of one record.
    #[instrument(skip(self))]
    pub async fn read(&self, id: &str) -> Result<serde_json::Value, ServerError> {
        let not_found = || ServerError::NotFound("Item not found".to_string());
        let path = self.path_for(id).ok_or_else(not_found)?;
        if !tokio::fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            return Err(not_found());
        }

        let content = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| ServerError::Internal(format!("cannot read record {}: {}", id, e)))?;
        serde_json::from_str(&content)
            .map_err(|e| ServerError::Internal(format!("record {} is not JSON: {}", id, e)))
    }

    /// Writes `record` as `<epoch-seconds>.json`, or `<epoch-seconds>_<n>.json`
    /// if that name is taken.
    #[instrument(skip(self, record), fields(moves = record.moves().len()))]
    pub async fn write(&self, record: &GameRecord) -> Result<RecordId, ServerError> {
        let json = record
            .to_json()
            .map_err(|e| ServerError::Internal(e.to_string()))?;
        let stamp = chrono::Utc::now().timestamp();

        let mut name = format!("{}.json", stamp);
        let mut attempt = 1;
        while tokio::fs::try_exists(self.root.join(&name)).await.unwrap_or(false) {
            name = format!("{}_{}.json", stamp, attempt);
            attempt += 1;
        }

        tokio::fs::write(self.root.join(&name), json)
            .await
            .map_err(|e| ServerError::Internal(format!("cannot write record {}: {}", name, e)))?;
        info!(record = %name, "Saved game record");
        Ok(RecordId::from(name))
    }

    /// Path for `id`, or `None` if it could escape the directory.
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let unsafe_name = id.is_empty() || id == "." || id.contains("..") || id.contains(['/', '\\']);
        (!unsafe_name).then(|| self.root.join(id))
    }
}
