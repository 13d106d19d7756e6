use std::{collections::BTreeMap, path::PathBuf};

use serde::{Deserialize, Serialize};

use crate::agents::AgentKind;

// ── Skills ───────────────────────────────────────────────────────────────────

/// A validated, installable skill.
///
/// Constructed only by [`crate::discover`] after its manifest passed
/// validation; immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Skill {
    /// Identifier from the manifest frontmatter. Never empty.
    pub name: String,
    /// Human-readable summary from the frontmatter. Never empty.
    pub description: String,
    /// Absolute path of the skill's root directory.
    pub path: PathBuf,
    /// Remaining frontmatter keys, scalar values stringified.
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

// ── Sources ──────────────────────────────────────────────────────────────────

/// Classification of a resolved source string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Github,
    Gitlab,
    /// Any other git host.
    Git,
    /// A path on the local filesystem; no clone step.
    Local,
}

/// Resolution of a user-supplied source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSource {
    pub kind: SourceKind,
    /// Canonical fetch URL, or the filesystem path for local sources.
    pub url: String,
    /// Relative path within the repository to scope discovery to.
    /// Never contains `..` components.
    pub subpath: Option<String>,
}

// ── Installation ─────────────────────────────────────────────────────────────

/// Whether a skill is installed into the current project or the user's home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallScope {
    Project,
    Global,
}

/// Result of one (skill, agent) installation attempt.
#[derive(Debug, Clone, Serialize)]
pub struct InstallOutcome {
    pub skill: String,
    pub agent: AgentKind,
    /// Computed destination directory, even when the copy failed.
    pub path: PathBuf,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ── Favourites ───────────────────────────────────────────────────────────────

/// A bookmarked repository, independent of any discovered skill.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favourite {
    pub id: String,
    pub repo: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "addedAt")]
    pub added_at_ms: u64,
}

/// On-disk favourites document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavouritesFile {
    pub version: u32,
    #[serde(default)]
    pub favourites: Vec<Favourite>,
}

impl Default for FavouritesFile {
    fn default() -> Self {
        Self {
            version: 1,
            favourites: Vec::new(),
        }
    }
}
