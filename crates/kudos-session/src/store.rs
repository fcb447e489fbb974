use std::path::{Path, PathBuf};

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::Mutex;

use kudos_types::{KudosError, Role, User, normalize_username};

/// Account storage. Usernames are the key, already normalized by
/// [`User::new`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<User>, KudosError>;
    async fn upsert(&self, user: User) -> Result<(), KudosError>;
    async fn list(&self) -> Result<Vec<User>, KudosError>;
}

/// Accounts a fresh deployment starts with.
pub fn default_users() -> Vec<User> {
    vec![
        User::new("dad", "654321", "Papa", Role::Admin),
        User::new("zaki", "123456", "Zaki", Role::Executor),
    ]
}

/// In-memory account store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: DashMap<String, User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defaults() -> Self {
        let store = Self::new();
        for user in default_users() {
            store.users.insert(user.username.clone(), user);
        }
        store
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find(&self, username: &str) -> Result<Option<User>, KudosError> {
        Ok(self.users.get(&normalize_username(username)).map(|u| u.clone()))
    }

    async fn upsert(&self, user: User) -> Result<(), KudosError> {
        self.users.insert(user.username.clone(), user);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<User>, KudosError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}

/// Durable account store: one JSON file, written atomically. Lives in the
/// shared room directory so every device sees the same accounts.
pub struct FileUserStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileUserStore {
    pub fn new(room_dir: &Path) -> Self {
        Self {
            path: room_dir.join("users.json"),
            write_lock: Mutex::new(()),
        }
    }

    /// Open the store, seeding the defaults if no account file exists yet.
    pub async fn open_seeded(room_dir: &Path) -> Result<Self, KudosError> {
        let store = Self::new(room_dir);
        if !store.path.exists() {
            store.save(&default_users())?;
        }
        Ok(store)
    }

    fn load(&self) -> Result<Vec<User>, KudosError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| KudosError::Storage(format!("failed to read users: {e}")))?;
        serde_json::from_str(&content)
            .map_err(|e| KudosError::Storage(format!("failed to parse users: {e}")))
    }

    fn save(&self, users: &[User]) -> Result<(), KudosError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| KudosError::Storage(format!("failed to create user dir: {e}")))?;
        }
        let tmp_path = self.path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(users)
            .map_err(|e| KudosError::Storage(format!("failed to serialize users: {e}")))?;
        std::fs::write(&tmp_path, content)
            .map_err(|e| KudosError::Storage(format!("failed to write users: {e}")))?;
        std::fs::rename(&tmp_path, &self.path)
            .map_err(|e| KudosError::Storage(format!("failed to rename users: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn find(&self, username: &str) -> Result<Option<User>, KudosError> {
        let target = normalize_username(username);
        Ok(self.load()?.into_iter().find(|u| u.username == target))
    }

    async fn upsert(&self, user: User) -> Result<(), KudosError> {
        let _guard = self.write_lock.lock().await;
        let mut users = self.load()?;
        match users.iter_mut().find(|u| u.username == user.username) {
            Some(existing) => *existing = user,
            None => users.push(user),
        }
        self.save(&users)
    }

    async fn list(&self) -> Result<Vec<User>, KudosError> {
        let mut users = self.load()?;
        users.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(users)
    }
}
