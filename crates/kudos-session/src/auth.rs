use std::sync::Arc;

use kudos_ledger::Ledger;
use kudos_types::{KudosError, Result, Role, Session, User, normalize_username};

use crate::store::UserStore;

/// Login, registration and password management, plus the once-per-session
/// ledger reconciliation at login.
pub struct SessionManager {
    users: Arc<dyn UserStore>,
    ledger: Ledger,
}

impl SessionManager {
    pub fn new(users: Arc<dyn UserStore>, ledger: Ledger) -> Self {
        Self { users, ledger }
    }

    /// Authenticate and open a session.
    ///
    /// Unknown executor usernames register themselves on first login;
    /// unknown admin usernames fail. On success the acting user's ledger is
    /// reconciled — the only point in a session where that happens. A failed
    /// reconcile is logged and does not block the login.
    pub async fn login(&self, username: &str, password: &str, role: Role) -> Result<Session> {
        let username = normalize_username(username);
        let password = password.trim();
        if username.is_empty() || password.is_empty() {
            return Err(KudosError::Validation(
                "username and password are required".into(),
            ));
        }

        let user = match self.users.find(&username).await? {
            Some(user) => {
                if user.password != password {
                    return Err(KudosError::AuthFailed("wrong password".into()));
                }
                if user.role != role {
                    return Err(KudosError::AuthFailed(format!(
                        "account '{username}' is registered as {:?}",
                        user.role
                    )));
                }
                user
            }
            None if role == Role::Admin => {
                return Err(KudosError::AuthFailed(format!(
                    "admin account '{username}' does not exist"
                )));
            }
            None => {
                // First login registers the executor account.
                let user = User::new(&username, password, &username, Role::Executor);
                self.users.upsert(user.clone()).await?;
                tracing::info!(username = %user.username, "registered new executor");
                user
            }
        };

        if let Err(e) = self.ledger.reconcile(&user.username).await {
            tracing::warn!(username = %user.username, "ledger reconcile failed at login: {e}");
        }

        Ok(Session::for_user(&user))
    }

    pub async fn change_password(&self, username: &str, old: &str, new: &str) -> Result<()> {
        let mut user = self
            .users
            .find(username)
            .await?
            .ok_or_else(|| KudosError::UserNotFound(username.to_string()))?;
        if user.password != old {
            return Err(KudosError::AuthFailed("wrong password".into()));
        }
        if new.len() < 4 {
            return Err(KudosError::Validation(
                "new password must be at least 4 characters".into(),
            ));
        }
        user.password = new.to_string();
        self.users.upsert(user).await
    }

    pub async fn update_nickname(&self, username: &str, nickname: &str) -> Result<()> {
        let mut user = self
            .users
            .find(username)
            .await?
            .ok_or_else(|| KudosError::UserNotFound(username.to_string()))?;
        user.nickname = nickname.to_string();
        self.users.upsert(user).await
    }

    /// Resolve a stored account.
    pub async fn user(&self, username: &str) -> Result<User> {
        self.users
            .find(username)
            .await?
            .ok_or_else(|| KudosError::UserNotFound(username.to_string()))
    }

    /// All executor accounts, for the admin's target picker.
    pub async fn executors(&self) -> Result<Vec<User>> {
        Ok(self
            .users
            .list()
            .await?
            .into_iter()
            .filter(|u| u.role == Role::Executor)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::InMemoryUserStore;
    use kudos_ledger::{MemoryScoreStore, ScoreStore};

    struct Fixture {
        manager: SessionManager,
        local: Arc<MemoryScoreStore>,
        remote: Arc<MemoryScoreStore>,
    }

    fn fixture() -> Fixture {
        let local = Arc::new(MemoryScoreStore::new());
        let remote = Arc::new(MemoryScoreStore::new());
        let ledger = Ledger::new(local.clone(), remote.clone());
        let manager = SessionManager::new(Arc::new(InMemoryUserStore::with_defaults()), ledger);
        Fixture {
            manager,
            local,
            remote,
        }
    }

    #[tokio::test]
    async fn test_login_known_executor() {
        let f = fixture();
        let session = f
            .manager
            .login("zaki", "123456", Role::Executor)
            .await
            .unwrap();
        assert_eq!(session.username, "zaki");
        assert!(!session.is_admin());
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let f = fixture();
        let result = f.manager.login("zaki", "nope", Role::Executor).await;
        assert!(matches!(result, Err(KudosError::AuthFailed(_))));
    }

    #[tokio::test]
    async fn test_login_role_mismatch() {
        let f = fixture();
        let result = f.manager.login("zaki", "123456", Role::Admin).await;
        assert!(matches!(result, Err(KudosError::AuthFailed(_))));
    }

    #[tokio::test]
    async fn test_unknown_admin_rejected() {
        let f = fixture();
        let result = f.manager.login("mom", "secret", Role::Admin).await;
        assert!(matches!(result, Err(KudosError::AuthFailed(_))));
    }

    #[tokio::test]
    async fn test_unknown_executor_auto_registers() {
        let f = fixture();
        let session = f
            .manager
            .login("momo", "momopw", Role::Executor)
            .await
            .unwrap();
        assert_eq!(session.username, "momo");

        // Second login reuses the registered account.
        assert!(
            f.manager
                .login("momo", "momopw", Role::Executor)
                .await
                .is_ok()
        );
        assert!(
            f.manager
                .login("momo", "other", Role::Executor)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_empty_credentials_rejected() {
        let f = fixture();
        let result = f.manager.login("  ", "123456", Role::Executor).await;
        assert!(matches!(result, Err(KudosError::Validation(_))));
    }

    #[tokio::test]
    async fn test_login_reconciles_ledger() {
        let f = fixture();
        f.local.put("zaki", 40).await.unwrap();
        f.remote.put("zaki", 55).await.unwrap();

        f.manager
            .login("zaki", "123456", Role::Executor)
            .await
            .unwrap();

        // The stale local copy caught up with the larger remote value.
        assert_eq!(f.local.get("zaki").await.unwrap(), Some(55));
        assert_eq!(f.remote.get("zaki").await.unwrap(), Some(55));
    }

    #[tokio::test]
    async fn test_change_password_rules() {
        let f = fixture();
        assert!(matches!(
            f.manager.change_password("zaki", "wrong", "newpw").await,
            Err(KudosError::AuthFailed(_))
        ));
        assert!(matches!(
            f.manager.change_password("zaki", "123456", "abc").await,
            Err(KudosError::Validation(_))
        ));

        f.manager
            .change_password("zaki", "123456", "newpw")
            .await
            .unwrap();
        assert!(
            f.manager
                .login("zaki", "newpw", Role::Executor)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_update_nickname() {
        let f = fixture();
        f.manager.update_nickname("zaki", "Captain Z").await.unwrap();
        let session = f
            .manager
            .login("zaki", "123456", Role::Executor)
            .await
            .unwrap();
        assert_eq!(session.nickname, "Captain Z");
    }

    #[tokio::test]
    async fn test_executors_listed() {
        let f = fixture();
        let executors = f.manager.executors().await.unwrap();
        assert_eq!(executors.len(), 1);
        assert_eq!(executors[0].username, "zaki");
    }
}
