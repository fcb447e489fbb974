use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{RwLock, watch};
use uuid::Uuid;

use kudos_types::{KudosError, NewSubmission, Submission};

use crate::snapshot::Snapshot;
use crate::traits::{SnapshotStream, SubmissionChannel};

/// In-process transport: full-snapshot-replace broadcast over a tokio watch
/// channel. Every connected party sees the same rebuilt snapshot after every
/// mutation, which is exactly the delivery model of the shared store.
pub struct MemoryChannel {
    submissions: RwLock<HashMap<Uuid, Submission>>,
    snapshot_tx: watch::Sender<Snapshot>,
    subscribed: Arc<AtomicBool>,
    online: AtomicBool,
}

impl MemoryChannel {
    pub fn new() -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        Self {
            submissions: RwLock::new(HashMap::new()),
            snapshot_tx,
            subscribed: Arc::new(AtomicBool::new(false)),
            online: AtomicBool::new(true),
        }
    }

    /// A channel that refuses every remote operation, as when the transport
    /// was never configured.
    pub fn offline() -> Self {
        let channel = Self::new();
        channel.online.store(false, Ordering::SeqCst);
        channel
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> Result<(), KudosError> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(KudosError::ChannelUnavailable(
                "transport not reachable or not configured".into(),
            ))
        }
    }

    fn broadcast(&self, submissions: &HashMap<Uuid, Submission>) {
        let snapshot = Snapshot::from_unordered(submissions.values().cloned().collect());
        self.snapshot_tx.send_replace(snapshot);
    }
}

impl Default for MemoryChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionChannel for MemoryChannel {
    async fn publish(&self, new: NewSubmission) -> Result<Uuid, KudosError> {
        self.ensure_online()?;
        let submission = Submission::accept(new, Uuid::new_v4());
        let key = submission.key;

        let mut submissions = self.submissions.write().await;
        submissions.insert(key, submission);
        self.broadcast(&submissions);
        Ok(key)
    }

    async fn remove(&self, key: Uuid) -> Result<(), KudosError> {
        self.ensure_online()?;
        let mut submissions = self.submissions.write().await;
        if submissions.remove(&key).is_some() {
            self.broadcast(&submissions);
        }
        Ok(())
    }

    async fn take(&self, key: Uuid) -> Result<Option<Submission>, KudosError> {
        self.ensure_online()?;
        let mut submissions = self.submissions.write().await;
        let taken = submissions.remove(&key);
        if taken.is_some() {
            self.broadcast(&submissions);
        }
        Ok(taken)
    }

    async fn current_snapshot(&self) -> Result<Snapshot, KudosError> {
        Ok(self.snapshot_tx.borrow().clone())
    }

    fn subscribe(&self) -> Option<SnapshotStream> {
        if self.subscribed.swap(true, Ordering::SeqCst) {
            return None;
        }
        Some(SnapshotStream::new(
            self.snapshot_tx.subscribe(),
            self.subscribed.clone(),
        ))
    }
}
