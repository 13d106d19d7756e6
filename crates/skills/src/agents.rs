//! Static registry of supported coding agents.
//!
//! A closed, declarative table: each agent has a CLI id, a display name,
//! skills directories for both install scopes, and a marker directory whose
//! presence under the home directory means the agent is installed locally.

use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// A supported coding agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentKind {
    Claude,
    Codex,
    Cursor,
    Opencode,
    Windsurf,
    Gemini,
}

struct AgentSpec {
    id: &'static str,
    display: &'static str,
    /// Skills directory, relative to the project root or the home directory.
    skills_dir: &'static str,
    /// Directory under home whose existence marks the agent as installed.
    marker: &'static str,
}

const fn spec(kind: AgentKind) -> &'static AgentSpec {
    match kind {
        AgentKind::Claude => &AgentSpec {
            id: "claude",
            display: "Claude Code",
            skills_dir: ".claude/skills",
            marker: ".claude",
        },
        AgentKind::Codex => &AgentSpec {
            id: "codex",
            display: "Codex",
            skills_dir: ".codex/skills",
            marker: ".codex",
        },
        AgentKind::Cursor => &AgentSpec {
            id: "cursor",
            display: "Cursor",
            skills_dir: ".cursor/skills",
            marker: ".cursor",
        },
        AgentKind::Opencode => &AgentSpec {
            id: "opencode",
            display: "opencode",
            skills_dir: ".opencode/skills",
            marker: ".opencode",
        },
        AgentKind::Windsurf => &AgentSpec {
            id: "windsurf",
            display: "Windsurf",
            skills_dir: ".windsurf/skills",
            marker: ".windsurf",
        },
        AgentKind::Gemini => &AgentSpec {
            id: "gemini",
            display: "Gemini CLI",
            skills_dir: ".gemini/skills",
            marker: ".gemini",
        },
    }
}

impl AgentKind {
    pub const fn all() -> &'static [AgentKind] {
        &[
            AgentKind::Claude,
            AgentKind::Codex,
            AgentKind::Cursor,
            AgentKind::Opencode,
            AgentKind::Windsurf,
            AgentKind::Gemini,
        ]
    }

    pub fn id(self) -> &'static str {
        spec(self).id
    }

    pub fn display_name(self) -> &'static str {
        spec(self).display
    }

    /// Project-scope skills directory, relative to the project root.
    pub fn project_skills_dir(self) -> &'static str {
        spec(self).skills_dir
    }

    /// Global-scope skills directory under the given home directory.
    pub fn global_skills_dir_in(self, home: &Path) -> PathBuf {
        home.join(spec(self).skills_dir)
    }

    /// Global-scope skills directory under the user's home directory.
    pub fn global_skills_dir(self) -> Option<PathBuf> {
        hoist_config::home_dir().map(|home| self.global_skills_dir_in(&home))
    }

    fn is_installed_in(self, home: &Path) -> bool {
        home.join(spec(self).marker).is_dir()
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for AgentKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        AgentKind::all()
            .iter()
            .copied()
            .find(|a| a.id() == wanted)
            .ok_or_else(|| {
                let known = AgentKind::all()
                    .iter()
                    .map(|a| a.id())
                    .collect::<Vec<_>>()
                    .join(", ");
                anyhow::anyhow!("unknown agent '{s}' (known agents: {known})")
            })
    }
}

/// Agents whose marker directory exists under the user's home directory.
pub fn detect_installed() -> Vec<AgentKind> {
    let Some(home) = hoist_config::home_dir() else {
        return Vec::new();
    };
    detect_installed_in(&home)
}

fn detect_installed_in(home: &Path) -> Vec<AgentKind> {
    AgentKind::all()
        .iter()
        .copied()
        .filter(|a| a.is_installed_in(home))
        .collect()
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_round_trip_through_from_str() {
        for agent in AgentKind::all() {
            assert_eq!(agent.id().parse::<AgentKind>().unwrap(), *agent);
        }
        assert_eq!("CODEX".parse::<AgentKind>().unwrap(), AgentKind::Codex);
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let err = "emacs".parse::<AgentKind>().unwrap_err();
        assert!(err.to_string().contains("unknown agent"));
        assert!(err.to_string().contains("claude"));
    }

    #[test]
    fn global_dir_is_under_home() {
        let home = Path::new("/home/dev");
        assert_eq!(
            AgentKind::Codex.global_skills_dir_in(home),
            PathBuf::from("/home/dev/.codex/skills")
        );
    }

    #[test]
    fn detect_installed_probes_marker_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join(".claude")).unwrap();
        std::fs::create_dir_all(tmp.path().join(".cursor")).unwrap();
        // A marker that is a file, not a directory, does not count.
        std::fs::write(tmp.path().join(".codex"), "not a dir").unwrap();

        let found = detect_installed_in(tmp.path());
        assert_eq!(found, vec![AgentKind::Claude, AgentKind::Cursor]);
    }
}
