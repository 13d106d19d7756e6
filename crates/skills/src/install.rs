//! Copies validated skills into agent skills directories.
//!
//! Installation is a one-shot overwrite copy: an existing destination is
//! replaced, never merged. Failures are captured per (skill, agent) pair so
//! one broken destination never aborts the rest of a run.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::{info, warn};

use crate::{
    agents::AgentKind,
    types::{InstallOutcome, InstallScope, Skill},
};

/// Files excluded from the copy by exact name.
const EXCLUDED_FILES: &[&str] = &["README.md", "metadata.json"];

/// Skills directory for an agent at the given scope.
pub fn skills_dir(agent: AgentKind, scope: InstallScope) -> anyhow::Result<PathBuf> {
    match scope {
        InstallScope::Project => {
            let cwd = std::env::current_dir().context("could not determine working directory")?;
            Ok(cwd.join(agent.project_skills_dir()))
        },
        InstallScope::Global => agent
            .global_skills_dir()
            .context("could not determine home directory"),
    }
}

/// Install one skill for one agent. Never returns an error; failures are
/// recorded in the outcome.
pub async fn install(skill: &Skill, agent: AgentKind, scope: InstallScope) -> InstallOutcome {
    let dest_root = match skills_dir(agent, scope) {
        Ok(dir) => dir,
        Err(e) => {
            return InstallOutcome {
                skill: skill.name.clone(),
                agent,
                path: PathBuf::new(),
                success: false,
                error: Some(e.to_string()),
            };
        },
    };
    install_into(skill, agent, &dest_root).await
}

/// Install the full (skills × agents) cross-product sequentially, collecting
/// every outcome. A failed pair never cancels its siblings.
pub async fn install_all(
    skills: &[Skill],
    agents: &[AgentKind],
    scope: InstallScope,
) -> Vec<InstallOutcome> {
    let mut outcomes = Vec::with_capacity(skills.len() * agents.len());
    for skill in skills {
        for agent in agents {
            outcomes.push(install(skill, *agent, scope).await);
        }
    }
    outcomes
}

/// Whether a skill of this name is already installed. Existence check only;
/// content drift between source and destination is not detected.
pub fn is_installed(name: &str, agent: AgentKind, scope: InstallScope) -> bool {
    skills_dir(agent, scope)
        .map(|dir| dir.join(name).is_dir())
        .unwrap_or(false)
}

async fn install_into(skill: &Skill, agent: AgentKind, dest_root: &Path) -> InstallOutcome {
    let dest = dest_root.join(&skill.name);
    let result = write_skill_tree(&skill.path, &dest).await;

    match result {
        Ok(()) => {
            info!(skill = %skill.name, agent = %agent, path = %dest.display(), "installed skill");
            InstallOutcome {
                skill: skill.name.clone(),
                agent,
                path: dest,
                success: true,
                error: None,
            }
        },
        Err(e) => {
            warn!(skill = %skill.name, agent = %agent, %e, "installation failed");
            InstallOutcome {
                skill: skill.name.clone(),
                agent,
                path: dest,
                success: false,
                error: Some(e.to_string()),
            }
        },
    }
}

/// Replace `dest` with a filtered copy of `src`.
async fn write_skill_tree(src: &Path, dest: &Path) -> anyhow::Result<()> {
    if dest.exists() {
        tokio::fs::remove_dir_all(dest)
            .await
            .with_context(|| format!("failed to replace {}", dest.display()))?;
    }
    if let Some(parent) = dest.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    copy_dir_filtered(src, dest)
}

/// Recursive copy applying the exclusion rules at every level: authoring
/// artifacts (`README.md`, `metadata.json`) and underscore-prefixed entries
/// are not part of the runtime payload.
fn copy_dir_filtered(src: &Path, dest: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(dest)
        .with_context(|| format!("failed to create {}", dest.display()))?;
    for entry in
        std::fs::read_dir(src).with_context(|| format!("failed to read {}", src.display()))?
    {
        let entry = entry?;
        let file_type = entry.file_type()?;
        let name = entry.file_name();
        if is_excluded(&name.to_string_lossy(), file_type.is_file()) {
            continue;
        }
        let dest_path = dest.join(&name);
        if file_type.is_dir() {
            copy_dir_filtered(&entry.path(), &dest_path)?;
        } else {
            std::fs::copy(entry.path(), &dest_path)
                .with_context(|| format!("failed to copy {}", entry.path().display()))?;
        }
    }
    Ok(())
}

fn is_excluded(name: &str, is_file: bool) -> bool {
    name.starts_with('_') || (is_file && EXCLUDED_FILES.contains(&name))
}
