use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::KudosConfig;

/// Show the effective configuration, or update and persist it.
pub fn config(
    state_dir: &Path,
    room_dir: Option<PathBuf>,
    device_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = KudosConfig::load(state_dir)?;

    let changed = room_dir.is_some() || device_dir.is_some();
    if let Some(dir) = room_dir {
        config.room_dir = Some(dir);
    }
    if let Some(dir) = device_dir {
        config.device_dir = Some(dir);
    }
    if changed {
        config.save(state_dir)?;
        println!("Saved {}", KudosConfig::config_path(state_dir).display());
    }

    println!("Room dir:   {}", config.room_dir(state_dir).display());
    println!("Device dir: {}", config.device_dir(state_dir).display());
    Ok(())
}
