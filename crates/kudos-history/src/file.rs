use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

use kudos_types::{Category, KudosError};

use crate::memory::most_recent_first;
use crate::record::HistoryRecord;
use crate::traits::HistoryLog;

/// Durable history log: the full record list as one JSON file in the shared
/// room directory, rewritten atomically on each append.
pub struct FileHistoryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileHistoryLog {
    pub fn new(room_dir: &Path) -> Self {
        Self {
            path: room_dir.join("history.json"),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Vec<HistoryRecord>, KudosError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| KudosError::Storage(format!("failed to read history: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| KudosError::Storage(format!("failed to parse history: {e}")))
    }

    fn save(&self, records: &[HistoryRecord]) -> Result<(), KudosError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KudosError::Storage(format!("failed to create history dir: {e}")))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(records)
            .map_err(|e| KudosError::Storage(format!("failed to serialize history: {e}")))?;
        std::fs::write(&tmp_path, content)
            .map_err(|e| KudosError::Storage(format!("failed to write history: {e}")))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| KudosError::Storage(format!("failed to rename history: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl HistoryLog for FileHistoryLog {
    async fn append(&self, record: HistoryRecord) -> Result<(), KudosError> {
        let _guard = self.write_lock.lock().await;
        let mut records = self.load()?;
        records.push(record);
        self.save(&records)
    }

    async fn latest_hash(&self) -> Result<Option<String>, KudosError> {
        Ok(self.load()?.last().map(|r| r.hash.clone()))
    }

    async fn query_by_counterpart(
        &self,
        counterpart: &str,
    ) -> Result<Vec<HistoryRecord>, KudosError> {
        let records = self.load()?;
        Ok(most_recent_first(
            records
                .into_iter()
                .filter(|r| r.counterpart == counterpart)
                .collect(),
        ))
    }

    async fn query_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<HistoryRecord>, KudosError> {
        let records = self.load()?;
        Ok(most_recent_first(
            records.into_iter().filter(|r| r.category == category).collect(),
        ))
    }

    async fn all_records(&self) -> Result<Vec<HistoryRecord>, KudosError> {
        Ok(most_recent_first(self.load()?))
    }

    async fn verify_integrity(&self) -> Result<bool, KudosError> {
        let records = self.load()?;
        for (i, record) in records.iter().enumerate() {
            if i == 0 {
                if record.previous_hash.is_some() {
                    return Ok(false);
                }
            } else if record.previous_hash.as_ref() != Some(&records[i - 1].hash) {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
