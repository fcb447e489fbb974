use async_trait::async_trait;
use dashmap::DashMap;

use kudos_types::KudosError;

use crate::traits::ScoreStore;

/// In-memory score store. Stands in for the remote copy in tests and for
/// either copy in single-process deployments.
#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    scores: DashMap<String, i64>,
}

impl MemoryScoreStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryScoreStore {
    async fn get(&self, username: &str) -> Result<Option<i64>, KudosError> {
        Ok(self.scores.get(username).map(|v| *v))
    }

    async fn put(&self, username: &str, value: i64) -> Result<(), KudosError> {
        self.scores.insert(username.to_string(), value);
        Ok(())
    }
}
