use async_trait::async_trait;

use kudos_types::KudosError;

/// One copy of the per-user point balances. The ledger holds two of these:
/// a durable local copy and the authoritative remote copy.
#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Raw stored value, `None` if the user has never been written.
    async fn get(&self, username: &str) -> Result<Option<i64>, KudosError>;

    /// Overwrite the stored value.
    async fn put(&self, username: &str, value: i64) -> Result<(), KudosError>;
}
