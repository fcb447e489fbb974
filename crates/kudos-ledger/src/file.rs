use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use kudos_types::KudosError;

use crate::traits::ScoreStore;

/// Durable score store: one JSON object mapping username to balance, written
/// atomically (.tmp then rename). Backs the per-device local ledger copy.
pub struct FileScoreStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileScoreStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("scores.json"),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<String, i64>, KudosError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| KudosError::Storage(format!("failed to read score file: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| KudosError::Storage(format!("failed to parse score file: {e}")))
    }

    fn save(&self, scores: &HashMap<String, i64>) -> Result<(), KudosError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KudosError::Storage(format!("failed to create score dir: {e}")))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(scores)
            .map_err(|e| KudosError::Storage(format!("failed to serialize scores: {e}")))?;
        std::fs::write(&tmp_path, content)
            .map_err(|e| KudosError::Storage(format!("failed to write score file: {e}")))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| KudosError::Storage(format!("failed to rename score file: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for FileScoreStore {
    async fn get(&self, username: &str) -> Result<Option<i64>, KudosError> {
        Ok(self.load()?.get(username).copied())
    }

    async fn put(&self, username: &str, value: i64) -> Result<(), KudosError> {
        let _guard = self.write_lock.lock().await;
        let mut scores = self.load()?;
        scores.insert(username.to_string(), value);
        self.save(&scores)
    }
}
