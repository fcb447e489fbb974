use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::watch;
use uuid::Uuid;

use kudos_types::{KudosError, NewSubmission, Submission};

use crate::snapshot::Snapshot;

/// The shared pending-submissions collection, one logical "room" per
/// deployment.
#[async_trait]
pub trait SubmissionChannel: Send + Sync {
    /// Append a new submission. The channel assigns the key and the server
    /// timestamp. Fails with `ChannelUnavailable` when the transport is not
    /// reachable or configured.
    async fn publish(&self, new: NewSubmission) -> Result<Uuid, KudosError>;

    /// Delete by key. Absent keys are not an error — idempotence is what
    /// keeps concurrent settle attempts safe.
    async fn remove(&self, key: Uuid) -> Result<(), KudosError>;

    /// Atomically remove and return a submission. Exactly one concurrent
    /// caller observes `Some`; everyone else gets `None`. This is the
    /// conditional write the approval path claims through.
    async fn take(&self, key: Uuid) -> Result<Option<Submission>, KudosError>;

    /// The last delivered snapshot, without waiting for a new event.
    async fn current_snapshot(&self) -> Result<Snapshot, KudosError>;

    /// Register the process-wide snapshot subscription. Returns `None` if a
    /// subscription is already live — a guard, not an error. Dropping the
    /// stream unsubscribes.
    fn subscribe(&self) -> Option<SnapshotStream>;
}

/// A lazy sequence of immutable snapshot values.
pub struct SnapshotStream {
    rx: watch::Receiver<Snapshot>,
    active: Arc<AtomicBool>,
}

impl SnapshotStream {
    pub fn new(rx: watch::Receiver<Snapshot>, active: Arc<AtomicBool>) -> Self {
        Self { rx, active }
    }

    /// Wait for the next snapshot. `None` once the channel side is gone.
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(self.rx.borrow_and_update().clone())
    }

    /// The most recently delivered snapshot, without waiting.
    pub fn latest(&self) -> Snapshot {
        self.rx.borrow().clone()
    }
}

impl Drop for SnapshotStream {
    fn drop(&mut self) {
        self.active.store(false, Ordering::SeqCst);
    }
}
