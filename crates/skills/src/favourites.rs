//! Persisted favourites with atomic writes.
//!
//! A small JSON document at a fixed per-user path, read-modify-written by
//! a single interactive process; no locking.

use std::path::{Path, PathBuf};

use anyhow::bail;

use crate::types::{Favourite, FavouritesFile};

pub struct FavouritesStore {
    path: PathBuf,
}

impl FavouritesStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Default favourites path: `<config_dir>/favourites.json`.
    pub fn default_path() -> PathBuf {
        hoist_config::config_dir().join("favourites.json")
    }

    /// Load the document from disk, returning a default if missing.
    pub fn load(&self) -> anyhow::Result<FavouritesFile> {
        if !self.path.exists() {
            return Ok(FavouritesFile::default());
        }
        let data = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Save the document atomically via temp file + rename.
    pub fn save(&self, file: &FavouritesFile) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(file)?;
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Add a repo to the favourites. Fails when it is already present.
    pub fn add(&self, repo: &str, description: &str) -> anyhow::Result<Favourite> {
        let mut file = self.load()?;
        if file.favourites.iter().any(|f| f.repo == repo) {
            bail!("'{repo}' is already a favourite");
        }
        let favourite = Favourite {
            id: uuid::Uuid::new_v4().to_string(),
            repo: repo.to_string(),
            description: description.to_string(),
            added_at_ms: now_ms(),
        };
        file.favourites.push(favourite.clone());
        self.save(&file)?;
        Ok(favourite)
    }

    /// Remove by id or repo string. Returns whether anything was removed.
    pub fn remove(&self, key: &str) -> anyhow::Result<bool> {
        let mut file = self.load()?;
        let before = file.favourites.len();
        file.favourites.retain(|f| f.id != key && f.repo != key);
        let removed = file.favourites.len() < before;
        if removed {
            self.save(&file)?;
        }
        Ok(removed)
    }

    pub fn list(&self) -> anyhow::Result<Vec<Favourite>> {
        Ok(self.load()?.favourites)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
