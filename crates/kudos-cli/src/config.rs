use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for the kudos CLI.
///
/// The room directory holds everything devices share (submissions, remote
/// scores, history, accounts); the device directory holds this device's
/// local ledger copy and session. Pointing several processes at one room
/// with distinct device dirs models a multi-device deployment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KudosConfig {
    /// Shared room directory. Defaults to `<state_dir>/room`.
    #[serde(default)]
    pub room_dir: Option<PathBuf>,

    /// Per-device directory. Defaults to `<state_dir>/device`.
    #[serde(default)]
    pub device_dir: Option<PathBuf>,
}

impl KudosConfig {
    /// State directory: `$KUDOS_STATE_DIR` or `~/.kudos`.
    pub fn default_state_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("KUDOS_STATE_DIR") {
            PathBuf::from(dir)
        } else {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".kudos")
        }
    }

    /// Config file path within the state directory.
    pub fn config_path(state_dir: &Path) -> PathBuf {
        state_dir.join("config.toml")
    }

    /// Load config from disk. Returns default if not found.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = Self::config_path(state_dir);
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = toml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to disk.
    pub fn save(&self, state_dir: &Path) -> Result<()> {
        let path = Self::config_path(state_dir);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Effective room directory: `$KUDOS_ROOM_DIR`, then config, then the
    /// default under the state directory.
    pub fn room_dir(&self, state_dir: &Path) -> PathBuf {
        if let Ok(dir) = std::env::var("KUDOS_ROOM_DIR") {
            return PathBuf::from(dir);
        }
        self.room_dir
            .clone()
            .unwrap_or_else(|| state_dir.join("room"))
    }

    /// Effective device directory.
    pub fn device_dir(&self, state_dir: &Path) -> PathBuf {
        if let Ok(dir) = std::env::var("KUDOS_DEVICE_DIR") {
            return PathBuf::from(dir);
        }
        self.device_dir
            .clone()
            .unwrap_or_else(|| state_dir.join("device"))
    }
}
