//! Directory resolution for hoist.
//!
//! The config directory holds the favourites file and any future per-user
//! state. Resolution order: programmatic override (`--config-dir`), the
//! `HOIST_CONFIG_DIR` environment variable, then the platform default
//! (`~/.config/hoist/` on Linux).

use std::{
    path::PathBuf,
    sync::RwLock,
};

use tracing::debug;

static CONFIG_DIR_OVERRIDE: RwLock<Option<PathBuf>> = RwLock::new(None);

/// Override the config directory for the rest of the process.
pub fn set_config_dir(path: PathBuf) {
    debug!(path = %path.display(), "config dir override set");
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.write() {
        *guard = Some(path);
    }
}

/// Clear a previously set config directory override.
pub fn clear_config_dir() {
    if let Ok(mut guard) = CONFIG_DIR_OVERRIDE.write() {
        *guard = None;
    }
}

/// Returns the per-user config directory.
pub fn config_dir() -> PathBuf {
    if let Ok(guard) = CONFIG_DIR_OVERRIDE.read()
        && let Some(path) = guard.as_ref()
    {
        return path.clone();
    }

    if let Ok(dir) = std::env::var("HOIST_CONFIG_DIR")
        && !dir.is_empty()
    {
        return PathBuf::from(dir);
    }

    directories::ProjectDirs::from("", "", "hoist")
        .map(|d| d.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns the user's home directory, if one can be determined.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.home_dir().to_path_buf())
}
