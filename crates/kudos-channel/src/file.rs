use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use uuid::Uuid;

use kudos_types::{KudosError, NewSubmission, Submission};

use crate::snapshot::Snapshot;
use crate::traits::{SnapshotStream, SubmissionChannel};

/// File-backed transport over a shared room directory.
///
/// Every read reloads the file, so independent processes pointed at the same
/// room converge on the next operation (poll-on-read); the watch broadcast
/// only reaches subscribers in this process. Cross-process `take` is
/// read-modify-write without a lock — this transport is the CLI stand-in for
/// a real realtime store, not the concurrency-bearing implementation.
pub struct FileChannel {
    path: PathBuf,
    write_lock: Mutex<()>,
    snapshot_tx: watch::Sender<Snapshot>,
    subscribed: Arc<AtomicBool>,
}

impl FileChannel {
    pub fn new(room_dir: &Path) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::default());
        Self {
            path: room_dir.join("submissions.json"),
            write_lock: Mutex::new(()),
            snapshot_tx,
            subscribed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<HashMap<Uuid, Submission>, KudosError> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            KudosError::ChannelUnavailable(format!("failed to read submissions: {e}"))
        })?;
        serde_json::from_str(&content).map_err(|e| {
            KudosError::ChannelUnavailable(format!("failed to parse submissions: {e}"))
        })
    }

    fn save(&self, submissions: &HashMap<Uuid, Submission>) -> Result<(), KudosError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                KudosError::ChannelUnavailable(format!("failed to create room dir: {e}"))
            })?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(submissions).map_err(|e| {
            KudosError::ChannelUnavailable(format!("failed to serialize submissions: {e}"))
        })?;
        std::fs::write(&tmp_path, content).map_err(|e| {
            KudosError::ChannelUnavailable(format!("failed to write submissions: {e}"))
        })?;
        std::fs::rename(&tmp_path, &self.path).map_err(|e| {
            KudosError::ChannelUnavailable(format!("failed to rename submissions: {e}"))
        })?;
        Ok(())
    }

    fn broadcast(&self, submissions: &HashMap<Uuid, Submission>) -> Snapshot {
        let snapshot = Snapshot::from_unordered(submissions.values().cloned().collect());
        self.snapshot_tx.send_replace(snapshot.clone());
        snapshot
    }
}

#[async_trait]
impl SubmissionChannel for FileChannel {
    async fn publish(&self, new: NewSubmission) -> Result<Uuid, KudosError> {
        let _guard = self.write_lock.lock().await;
        let mut submissions = self.load()?;
        let submission = Submission::accept(new, Uuid::new_v4());
        let key = submission.key;
        submissions.insert(key, submission);
        self.save(&submissions)?;
        self.broadcast(&submissions);
        Ok(key)
    }

    async fn remove(&self, key: Uuid) -> Result<(), KudosError> {
        let _guard = self.write_lock.lock().await;
        let mut submissions = self.load()?;
        if submissions.remove(&key).is_some() {
            self.save(&submissions)?;
        }
        self.broadcast(&submissions);
        Ok(())
    }

    async fn take(&self, key: Uuid) -> Result<Option<Submission>, KudosError> {
        let _guard = self.write_lock.lock().await;
        let mut submissions = self.load()?;
        let taken = submissions.remove(&key);
        if taken.is_some() {
            self.save(&submissions)?;
        }
        self.broadcast(&submissions);
        Ok(taken)
    }

    async fn current_snapshot(&self) -> Result<Snapshot, KudosError> {
        // Fresh read, so another process's writes are picked up here.
        let submissions = self.load()?;
        Ok(self.broadcast(&submissions))
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

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_types::{Category, Role, TaskDefinition, User};
    use tempfile::tempdir;

    fn claim(task_id: &str, submitter: &str) -> NewSubmission {
        let def = TaskDefinition::new(Category::Bounty, task_id, task_id, 15, "🔧");
        let user = User::new(submitter, "pw", submitter, Role::Executor);
        NewSubmission::claim(&def, &user, None)
    }

    #[tokio::test]
    async fn test_publish_visible_to_second_channel() {
        let dir = tempdir().unwrap();
        let writer = FileChannel::new(dir.path());
        let key = writer.publish(claim("b2", "zaki")).await.unwrap();

        // A different channel over the same room dir, as on another device.
        let reader = FileChannel::new(dir.path());
        let snapshot = reader.current_snapshot().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get(key).unwrap().submitter, "zaki");
    }

    #[tokio::test]
    async fn test_take_consumes_across_channels() {
        let dir = tempdir().unwrap();
        let device_a = FileChannel::new(dir.path());
        let device_b = FileChannel::new(dir.path());

        let key = device_a.publish(claim("b2", "zaki")).await.unwrap();
        assert!(device_b.take(key).await.unwrap().is_some());
        assert!(device_a.take(key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_room_reads_empty_snapshot() {
        let dir = tempdir().unwrap();
        let channel = FileChannel::new(dir.path());
        assert!(channel.current_snapshot().await.unwrap().is_empty());
    }
}
