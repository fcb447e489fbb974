use std::sync::Arc;

use kudos_types::Result;

use crate::traits::ScoreStore;

/// The two-copy point ledger: a durable local copy (per device) and the
/// authoritative remote copy (shared).
///
/// Every mutation clamps the result at zero, writes the local copy, then
/// pushes the new value to the remote copy best-effort. A failed push is
/// logged and left for the next reconciliation, never surfaced as an error
/// for an already-applied local mutation.
#[derive(Clone)]
pub struct Ledger {
    local: Arc<dyn ScoreStore>,
    remote: Arc<dyn ScoreStore>,
}

impl Ledger {
    pub fn new(local: Arc<dyn ScoreStore>, remote: Arc<dyn ScoreStore>) -> Self {
        Self { local, remote }
    }

    /// Current balance from the local copy. Unset users read as 0; this is
    /// the single place the default is applied.
    pub async fn balance(&self, username: &str) -> Result<i64> {
        Ok(self.local.get(username).await?.unwrap_or(0))
    }

    /// Add points. Returns the new balance.
    pub async fn credit(&self, username: &str, amount: i64) -> Result<i64> {
        self.apply(username, amount).await
    }

    /// Remove points, clamped at zero. Never fails for insufficient funds —
    /// callers that must not over-draw (the purchase flow) pre-check the
    /// balance; the penalty flow deliberately does not.
    pub async fn debit(&self, username: &str, amount: i64) -> Result<i64> {
        self.apply(username, -amount).await
    }

    async fn apply(&self, username: &str, delta: i64) -> Result<i64> {
        let next = (self.balance(username).await? + delta).max(0);
        self.local.put(username, next).await?;
        if let Err(e) = self.remote.put(username, next).await {
            tracing::warn!(username, balance = next, "failed to push balance to remote: {e}");
        }
        Ok(next)
    }

    /// Merge the local and remote copies, keeping `max(local, remote)` in
    /// both. Runs once per session start for the acting user.
    ///
    /// Max-wins means a stale smaller value can never clobber a larger one,
    /// at the cost of not propagating a legitimate decrease applied on
    /// another device while this one was offline — that penalty has to be
    /// re-applied. An unreachable remote leaves the local value untouched.
    pub async fn reconcile(&self, username: &str) -> Result<i64> {
        let local = self.balance(username).await?;
        let remote = match self.remote.get(username).await {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                tracing::warn!(username, "remote unreachable during reconcile: {e}");
                return Ok(local);
            }
        };

        let merged = local.max(remote);
        self.local.put(username, merged).await?;
        if let Err(e) = self.remote.put(username, merged).await {
            tracing::warn!(username, balance = merged, "failed to push reconciled balance: {e}");
        }
        tracing::info!(username, local, remote, merged, "reconciled ledger");
        Ok(merged)
    }
}
