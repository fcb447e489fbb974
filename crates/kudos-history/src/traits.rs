use async_trait::async_trait;

use kudos_types::{Category, KudosError};

use crate::record::HistoryRecord;

/// Append-only settled-event log. No update, no delete; queries return
/// most-recent-first. The approval engine writes here but never reads the
/// log to make decisions.
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Append a record.
    async fn append(&self, record: HistoryRecord) -> Result<(), KudosError>;

    /// The latest record hash, for chaining the next append.
    async fn latest_hash(&self) -> Result<Option<String>, KudosError>;

    /// Records where the given user was credited or debited.
    async fn query_by_counterpart(
        &self,
        counterpart: &str,
    ) -> Result<Vec<HistoryRecord>, KudosError>;

    /// Records of one category.
    async fn query_by_category(
        &self,
        category: Category,
    ) -> Result<Vec<HistoryRecord>, KudosError>;

    /// The full timeline.
    async fn all_records(&self) -> Result<Vec<HistoryRecord>, KudosError>;

    /// Walk the hash chain front to back.
    async fn verify_integrity(&self) -> Result<bool, KudosError>;
}
