//! The skill discovery engine.
//!
//! Given a repository checkout (or a subpath within it), produce the
//! authoritative, deduplicated, ordered list of installable skills. Search
//! runs in three tiers with strict precedence:
//!
//! 1. the effective root itself is a skill (`SKILL.md` directly present),
//! 2. conventional container directories (`skills/` and friends, plus the
//!    per-agent project directories),
//! 3. a bounded recursive walk, only when tier 2 found nothing.
//!
//! Candidates with unreadable or invalid manifests are skipped silently;
//! discovery never fails because one directory in a large repository is
//! malformed.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::{
    agents::AgentKind,
    parse::{self, SKILL_MANIFEST},
    source::validate_subpath,
    types::Skill,
};

/// Maximum directory depth for the recursive fallback, relative to the
/// effective root (direct children are depth 1).
const MAX_DEPTH: usize = 5;

/// Directories never descended into during the recursive walk.
const SKIPPED_DIRS: &[&str] = &[".git", ".hg", ".svn"];

/// Conventional container directories, in priority order.
const CONTAINER_VARIANTS: &[&str] = &[
    "skills",
    "skills/curated",
    "skills/experimental",
    "skills/system",
];

/// Container probe list: the generic variants, then each agent's
/// project-scope skills directory.
fn standard_containers() -> Vec<&'static str> {
    let mut containers: Vec<&'static str> = CONTAINER_VARIANTS.to_vec();
    containers.extend(AgentKind::all().iter().map(|a| a.project_skills_dir()));
    containers
}

/// Discover all skills under `root`, optionally scoped to `subpath`.
///
/// Deterministic for a fixed filesystem snapshot: containers are probed in
/// a fixed order and child directories are enumerated name-sorted. Returns
/// an empty catalog (not an error) when the effective root is missing or
/// contains no valid skill.
pub async fn discover(root: &Path, subpath: Option<&str>) -> anyhow::Result<Vec<Skill>> {
    let effective = match subpath {
        Some(sub) => root.join(validate_subpath(sub)?),
        None => root.to_path_buf(),
    };
    if !effective.is_dir() {
        debug!(path = %effective.display(), "discovery root does not exist");
        return Ok(Vec::new());
    }

    // Tier 1: the effective root is itself a skill. Nothing else is
    // searched, even when its manifest turns out to be invalid.
    if effective.join(SKILL_MANIFEST).is_file() {
        return Ok(load_candidate(&effective).await.into_iter().collect());
    }

    // Tier 2: standard containers, aggregated across all of them.
    let mut candidates: Vec<PathBuf> = Vec::new();
    for container in standard_containers() {
        let dir = effective.join(container);
        if !dir.is_dir() {
            continue;
        }
        for child in child_dirs_sorted(&dir) {
            if child.join(SKILL_MANIFEST).is_file() {
                candidates.push(child);
            }
        }
    }

    // Tier 3: bounded recursive walk, only when tier 2 came up empty.
    if candidates.is_empty() {
        walk(&effective, 0, &mut candidates);
    }

    let mut seen = HashSet::new();
    let mut skills = Vec::new();
    for dir in candidates {
        let resolved = resolve_path(&dir);
        if !seen.insert(resolved) {
            continue;
        }
        if let Some(skill) = load_candidate(&dir).await {
            skills.push(skill);
        }
    }

    Ok(skills)
}

/// Depth-first walk collecting every directory that holds a manifest.
/// `depth` is the depth of `dir`; children are `depth + 1`.
fn walk(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) {
    for child in child_dirs_sorted(dir) {
        let name = child.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if SKIPPED_DIRS.contains(&name) {
            continue;
        }
        // Symlinked directories can form cycles; stay on the real tree.
        if child
            .symlink_metadata()
            .map(|m| m.file_type().is_symlink())
            .unwrap_or(true)
        {
            continue;
        }
        if child.join(SKILL_MANIFEST).is_file() {
            out.push(child.clone());
        }
        if depth + 1 < MAX_DEPTH {
            walk(&child, depth + 1, out);
        }
    }
}

/// Immediate child directories of `dir`, name-sorted for determinism.
fn child_dirs_sorted(dir: &Path) -> Vec<PathBuf> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };
    let mut children: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.is_dir())
        .collect();
    children.sort();
    children
}

/// Read and validate one candidate directory; `None` on any failure.
async fn load_candidate(dir: &Path) -> Option<Skill> {
    let manifest_path = dir.join(SKILL_MANIFEST);
    let content = match tokio::fs::read_to_string(&manifest_path).await {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %manifest_path.display(), %e, "failed to read SKILL.md");
            return None;
        },
    };
    match parse::parse_manifest(&content) {
        Ok(manifest) => Some(Skill {
            name: manifest.name,
            description: manifest.description,
            path: resolve_path(dir),
            metadata: manifest.extra,
        }),
        Err(e) => {
            debug!(path = %dir.display(), %e, "skipping non-conforming SKILL.md");
            None
        },
    }
}

/// Resolved absolute path used for dedup and as the skill's locator.
fn resolve_path(dir: &Path) -> PathBuf {
    std::fs::canonicalize(dir).unwrap_or_else(|_| {
        std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf())
    })
}

/// Display names for a catalog: the manifest name, disambiguated with a
/// short hash of the path wherever two entries share a name. Presentation
/// only; never part of dedup or equality.
pub fn display_names(catalog: &[Skill]) -> Vec<String> {
    catalog
        .iter()
        .map(|skill| {
            let shared = catalog.iter().filter(|s| s.name == skill.name).count();
            if shared > 1 {
                format!("{} ({})", skill.name, short_path_hash(&skill.path))
            } else {
                skill.name.clone()
            }
        })
        .collect()
}

fn short_path_hash(path: &Path) -> String {
    let digest = Sha256::digest(path.to_string_lossy().as_bytes());
    let mut out = String::with_capacity(8);
    for byte in &digest[..4] {
        out.push_str(&format!("{byte:02x}"));
    }
    out
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(dir: &Path, name: &str, description: &str) {
        std::fs::create_dir_all(dir).unwrap();
        std::fs::write(
            dir.join(SKILL_MANIFEST),
            format!("---\nname: {name}\ndescription: {description}\n---\nbody\n"),
        )
        .unwrap();
    }

    #[tokio::test]
    async fn direct_hit_short_circuits() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(tmp.path(), "root-skill", "at the root");
        // A decoy below the root must not be reached.
        write_skill(&tmp.path().join("skills/decoy"), "decoy", "never found");

        let skills = discover(tmp.path(), None).await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "root-skill");
    }

    #[tokio::test]
    async fn direct_hit_with_invalid_manifest_yields_empty_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(SKILL_MANIFEST), "no frontmatter").unwrap();
        write_skill(&tmp.path().join("skills/real"), "real", "still skipped");

        let skills = discover(tmp.path(), None).await.unwrap();
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn standard_containers_aggregate_in_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("skills/beta"), "beta", "b");
        write_skill(&tmp.path().join("skills/alpha"), "alpha", "a");
        write_skill(&tmp.path().join("skills/curated/gamma"), "gamma", "c");
        write_skill(&tmp.path().join(".claude/skills/delta"), "delta", "d");
        // Invalid manifests inside a container are skipped, not fatal.
        std::fs::create_dir_all(tmp.path().join("skills/broken")).unwrap();
        std::fs::write(tmp.path().join("skills/broken/SKILL.md"), "---\nname: x\n---\n").unwrap();

        let skills = discover(tmp.path(), None).await.unwrap();
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        // Container order first, then name-sorted children within each.
        assert_eq!(names, vec!["alpha", "beta", "gamma", "delta"]);
    }

    #[tokio::test]
    async fn container_children_are_not_deduplicated_by_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("skills/one"), "same-name", "first");
        write_skill(&tmp.path().join("skills/two"), "same-name", "second");

        let skills = discover(tmp.path(), None).await.unwrap();
        assert_eq!(skills.len(), 2);
        assert_eq!(skills[0].name, skills[1].name);
        assert_ne!(skills[0].path, skills[1].path);
    }

    #[tokio::test]
    async fn recursive_fallback_respects_max_depth() {
        let tmp = tempfile::tempdir().unwrap();
        // Depth 5: found.
        write_skill(&tmp.path().join("a/b/c/d/deep"), "deep", "at depth five");
        let skills = discover(tmp.path(), None).await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "deep");

        // Depth 6: out of reach.
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("a/b/c/d/e/deeper"), "deeper", "at depth six");
        let skills = discover(tmp.path(), None).await.unwrap();
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn recursive_fallback_skips_vcs_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join(".git/hooks/fake"), "fake", "inside git metadata");
        write_skill(&tmp.path().join("tools/real"), "real", "outside");

        let skills = discover(tmp.path(), None).await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "real");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn recursive_fallback_skips_symlink_cycles() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("nested/real"), "real", "found once");
        std::os::unix::fs::symlink(tmp.path(), tmp.path().join("nested/loop")).unwrap();

        let skills = discover(tmp.path(), None).await.unwrap();
        assert_eq!(skills.len(), 1);
    }

    #[tokio::test]
    async fn standard_locations_suppress_recursive_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("skills/standard"), "standard", "tier two");
        write_skill(&tmp.path().join("lib/hidden"), "hidden", "tier three only");

        let skills = discover(tmp.path(), None).await.unwrap();
        let names: Vec<&str> = skills.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["standard"]);
    }

    #[tokio::test]
    async fn subpath_scopes_discovery() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("bundles/extra/skill"), "scoped", "via subpath");
        write_skill(&tmp.path().join("skills/other"), "other", "outside the scope");

        let skills = discover(tmp.path(), Some("bundles/extra/skill")).await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].name, "scoped");
    }

    #[tokio::test]
    async fn escaping_subpath_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        assert!(discover(tmp.path(), Some("../outside")).await.is_err());
    }

    #[tokio::test]
    async fn missing_subpath_yields_empty_catalog() {
        let tmp = tempfile::tempdir().unwrap();
        let skills = discover(tmp.path(), Some("does/not/exist")).await.unwrap();
        assert!(skills.is_empty());
    }

    #[tokio::test]
    async fn discovery_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("skills/a"), "a", "first");
        write_skill(&tmp.path().join("skills/b"), "b", "second");

        let first = discover(tmp.path(), None).await.unwrap();
        let second = discover(tmp.path(), None).await.unwrap();
        let paths = |skills: &[Skill]| {
            skills.iter().map(|s| s.path.clone()).collect::<HashSet<_>>()
        };
        assert_eq!(paths(&first), paths(&second));
    }

    #[tokio::test]
    async fn metadata_keys_are_retained() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("skills/rich")).unwrap();
        std::fs::write(
            tmp.path().join("skills/rich/SKILL.md"),
            "---\nname: rich\ndescription: has extras\nlicense: MIT\nhomepage: https://example.org\n---\nbody\n",
        )
        .unwrap();

        let skills = discover(tmp.path(), None).await.unwrap();
        assert_eq!(skills.len(), 1);
        assert_eq!(skills[0].metadata.get("license").map(String::as_str), Some("MIT"));
        assert_eq!(
            skills[0].metadata.get("homepage").map(String::as_str),
            Some("https://example.org")
        );
    }

    #[tokio::test]
    async fn display_names_disambiguate_duplicates() {
        let tmp = tempfile::tempdir().unwrap();
        write_skill(&tmp.path().join("skills/one"), "fixer", "first");
        write_skill(&tmp.path().join("skills/two"), "fixer", "second");
        write_skill(&tmp.path().join("skills/zzz"), "unique", "third");

        let skills = discover(tmp.path(), None).await.unwrap();
        let names = display_names(&skills);
        assert_eq!(names.len(), 3);
        assert_ne!(names[0], names[1]);
        assert!(names[0].starts_with("fixer ("));
        assert!(names[1].starts_with("fixer ("));
        assert_eq!(names[2], "unique");
    }
}
