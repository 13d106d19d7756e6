//! Skill discovery and installation.
//!
//! Skills are directories containing a `SKILL.md` file with YAML frontmatter
//! and markdown instructions. This crate resolves user-supplied sources,
//! clones them, locates the skills inside, and copies them into the config
//! directories of locally installed coding agents.

pub mod agents;
pub mod discover;
pub mod favourites;
pub mod fetch;
pub mod install;
pub mod parse;
pub mod search;
pub mod source;
pub mod types;
