//! Clone collaborator.
//!
//! Discovery only needs a local directory; this module owns how that
//! directory gets populated. The default implementation shells out to
//! `git clone --depth 1` into a temporary directory that lives exactly as
//! long as one run.

use std::path::{Path, PathBuf};

use {
    anyhow::{Context, bail},
    async_trait::async_trait,
    tokio::process::Command,
    tracing::debug,
};

/// Fetches a repository to a local path.
#[async_trait]
pub trait RepoFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> anyhow::Result<ClonedRepo>;
}

/// A checked-out repository in a temporary directory. The directory is
/// removed on [`ClonedRepo::cleanup`] or when the value is dropped.
#[derive(Debug)]
pub struct ClonedRepo {
    path: PathBuf,
    dir: Option<tempfile::TempDir>,
}

impl ClonedRepo {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the clone from disk. Dropping the value has the same effect;
    /// the explicit form surfaces removal errors.
    pub fn cleanup(mut self) -> anyhow::Result<()> {
        if let Some(dir) = self.dir.take() {
            let path = dir.path().to_path_buf();
            dir.close()
                .with_context(|| format!("failed to remove clone at {}", path.display()))?;
            debug!(path = %path.display(), "removed clone");
        }
        Ok(())
    }
}

/// Shallow-clones with the system `git`.
pub struct GitFetcher;

#[async_trait]
impl RepoFetcher for GitFetcher {
    async fn fetch(&self, url: &str) -> anyhow::Result<ClonedRepo> {
        which::which("git").context("git executable not found in PATH")?;

        let tmp = tempfile::tempdir().context("failed to create clone directory")?;
        let target = tmp.path().join("repo");

        let output = Command::new("git")
            .args(["clone", "--depth", "1", "--quiet"])
            .arg(url)
            .arg(&target)
            .output()
            .await
            .context("failed to run git clone")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("git clone failed for {url}: {}", stderr.trim());
        }

        debug!(%url, path = %target.display(), "cloned repository");
        Ok(ClonedRepo {
            path: target,
            dir: Some(tmp),
        })
    }
}
