use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::RwLock;

use kudos_types::{Category, KudosError};

use crate::record::HistoryRecord;
use crate::traits::HistoryLog;

/// In-memory history log (default).
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryLog {
    records: Arc<RwLock<Vec<HistoryRecord>>>,
    index_by_counterpart: Arc<DashMap<String, Vec<usize>>>,
}

impl InMemoryHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }
}

pub(crate) fn most_recent_first(mut records: Vec<HistoryRecord>) -> Vec<HistoryRecord> {
    // Reverse first so the stable sort keeps same-instant appends in
    // newest-first order too.
    records.reverse();
    records.sort_by(|a, b| b.finished_at.cmp(&a.finished_at));
    records
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn append(&self, record: HistoryRecord) -> Result<(), KudosError> {
        let mut records = self.records.write().await;
        let idx = records.len();
        self.index_by_counterpart
            .entry(record.counterpart.clone())
            .or_default()
            .push(idx);
        records.push(record);
        Ok(())
    }

    async fn latest_hash(&self) -> Result<Option<String>, KudosError> {
        let records = self.records.read().await;
        Ok(records.last().map(|r| r.hash.clone()))
    }

    async fn query_by_counterpart(
        &self,
        counterpart: &str,
    ) -> Result<Vec<HistoryRecord>, KudosError> {
        let records = self.records.read().await;
        let matched = self
            .index_by_counterpart
            .get(counterpart)
            .map(|indices| {
                indices
                    .iter()
                    .filter_map(|i| records.get(*i).cloned())
                    .collect()
            })
            .unwrap_or_default();
        Ok(most_recent_first(matched))
    }

    async fn query_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<HistoryRecord>, KudosError> {
        let records = self.records.read().await;
        Ok(most_recent_first(
            records
                .iter()
                .filter(|r| r.category == category)
                .cloned()
                .collect(),
        ))
    }

    async fn all_records(&self) -> Result<Vec<HistoryRecord>, KudosError> {
        let records = self.records.read().await;
        Ok(most_recent_first(records.clone()))
    }

    async fn verify_integrity(&self) -> Result<bool, KudosError> {
        let records = self.records.read().await;
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

#[cfg(test)]
mod tests {
    use super::*;

    async fn append_chained(
        log: &InMemoryHistoryLog,
        task_id: &str,
        points: i64,
        category: Category,
        counterpart: &str,
    ) {
        let prev = log.latest_hash().await.unwrap();
        let record = HistoryRecord::new(task_id, task_id, points, category, "dad", counterpart, prev);
        log.append(record).await.unwrap();
    }

    #[tokio::test]
    async fn test_append_and_query() {
        let log = InMemoryHistoryLog::new();
        append_chained(&log, "c1", 10, Category::Core, "zaki").await;
        append_chained(&log, "p1", -20, Category::Penalty, "zaki").await;
        append_chained(&log, "d1", 5, Category::Daily, "momo").await;

        assert_eq!(log.query_by_counterpart("zaki").await.unwrap().len(), 2);
        assert_eq!(log.query_by_counterpart("momo").await.unwrap().len(), 1);
        assert_eq!(
            log.query_by_category(Category::Penalty).await.unwrap().len(),
            1
        );
        assert_eq!(log.all_records().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_chain_integrity() {
        let log = InMemoryHistoryLog::new();
        append_chained(&log, "c1", 10, Category::Core, "zaki").await;
        append_chained(&log, "c2", 5, Category::Core, "zaki").await;
        assert!(log.verify_integrity().await.unwrap());
    }

    #[tokio::test]
    async fn test_broken_chain_detected() {
        let log = InMemoryHistoryLog::new();
        append_chained(&log, "c1", 10, Category::Core, "zaki").await;
        // An append that ignores the chain head.
        let orphan = HistoryRecord::new("c2", "c2", 5, Category::Core, "dad", "zaki", None);
        log.append(orphan).await.unwrap();
        assert!(!log.verify_integrity().await.unwrap());
    }

    #[tokio::test]
    async fn test_most_recent_first() {
        let log = InMemoryHistoryLog::new();
        append_chained(&log, "first", 1, Category::Core, "zaki").await;
        append_chained(&log, "second", 2, Category::Core, "zaki").await;

        let records = log.all_records().await.unwrap();
        assert_eq!(records[0].task_id, "second");
        assert_eq!(records[1].task_id, "first");
    }
}
