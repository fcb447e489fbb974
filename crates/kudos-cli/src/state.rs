use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use kudos_approval::ApprovalEngine;
use kudos_catalog::InMemoryCatalog;
use kudos_channel::FileChannel;
use kudos_history::FileHistoryLog;
use kudos_ledger::{FileScoreStore, Ledger};
use kudos_session::{FileUserStore, SessionManager};
use kudos_types::{Session, User};

use crate::config::KudosConfig;

/// Shared application state for CLI commands: the engine and its
/// collaborators wired over the room and device directories.
pub struct AppState {
    pub engine: ApprovalEngine,
    pub sessions: SessionManager,
    pub catalog: Arc<InMemoryCatalog>,
    pub channel: Arc<FileChannel>,
    pub history: Arc<FileHistoryLog>,
    pub ledger: Ledger,
    session_path: PathBuf,
}

impl AppState {
    pub async fn init(config: &KudosConfig, state_dir: &Path) -> Result<Self> {
        let room_dir = config.room_dir(state_dir);
        let device_dir = config.device_dir(state_dir);

        let catalog = Arc::new(InMemoryCatalog::with_defaults());
        let channel = Arc::new(FileChannel::new(&room_dir));
        let history = Arc::new(FileHistoryLog::new(&room_dir));
        let ledger = Ledger::new(
            Arc::new(FileScoreStore::new(&device_dir)),
            Arc::new(FileScoreStore::new(&room_dir)),
        );
        let users = Arc::new(
            FileUserStore::open_seeded(&room_dir)
                .await
                .context("Failed to open user store")?,
        );

        let engine = ApprovalEngine::new(
            catalog.clone(),
            channel.clone(),
            ledger.clone(),
            history.clone(),
        );
        let sessions = SessionManager::new(users, ledger.clone());

        Ok(Self {
            engine,
            sessions,
            catalog,
            channel,
            history,
            ledger,
            session_path: device_dir.join("session.json"),
        })
    }

    /// The persisted session on this device, if any.
    pub fn current_session(&self) -> Result<Option<Session>> {
        if !self.session_path.exists() {
            return Ok(None);
        }
        let content =
            std::fs::read_to_string(&self.session_path).context("Failed to read session file")?;
        let session = serde_json::from_str(&content).context("Failed to parse session file")?;
        Ok(Some(session))
    }

    pub fn save_session(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.session_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create device directory")?;
        }
        let content =
            serde_json::to_string_pretty(session).context("Failed to serialize session")?;
        std::fs::write(&self.session_path, content).context("Failed to write session file")?;
        Ok(())
    }

    pub fn clear_session(&self) -> Result<()> {
        if self.session_path.exists() {
            std::fs::remove_file(&self.session_path).context("Failed to remove session file")?;
        }
        Ok(())
    }

    /// The logged-in session, or a user-facing error.
    pub fn require_session(&self) -> Result<Session> {
        match self.current_session()? {
            Some(session) => Ok(session),
            None => bail!("Not logged in. Run `kudos login <username> <password>` first."),
        }
    }

    pub fn require_admin(&self) -> Result<Session> {
        let session = self.require_session()?;
        if !session.is_admin() {
            bail!("This command needs an admin session.");
        }
        Ok(session)
    }

    /// Full account record behind a session.
    pub async fn acting_user(&self, session: &Session) -> Result<User> {
        Ok(self.sessions.user(&session.username).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kudos_types::Role;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_session_roundtrip() {
        let dir = tempdir().unwrap();
        let config = KudosConfig::default();
        let state = AppState::init(&config, dir.path()).await.unwrap();

        assert!(state.current_session().unwrap().is_none());

        let user = User::new("dad", "654321", "Papa", Role::Admin);
        let session = Session::for_user(&user);
        state.save_session(&session).unwrap();
        assert!(state.current_session().unwrap().unwrap().is_admin());

        state.clear_session().unwrap();
        assert!(state.current_session().unwrap().is_none());
    }
}
