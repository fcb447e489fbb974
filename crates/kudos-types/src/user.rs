use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account roles. Admins approve and settle; executors claim tasks and
/// spend points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Executor,
}

/// A device-shared account. The credential model is a flat password match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub password: String,
    pub nickname: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Usernames are stored trimmed and lowercased so the same account
    /// resolves identically from every device.
    pub fn new(
        username: impl AsRef<str>,
        password: impl Into<String>,
        nickname: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            username: normalize_username(username.as_ref()),
            password: password.into(),
            nickname: nickname.into(),
            role,
            created_at: Utc::now(),
        }
    }

    pub fn display_name(&self) -> &str {
        if self.nickname.is_empty() {
            &self.username
        } else {
            &self.nickname
        }
    }
}

pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// The acting user's identity for the lifetime of a login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub nickname: String,
    pub role: Role,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn for_user(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            nickname: user.display_name().to_string(),
            role: user.role,
            logged_in_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
