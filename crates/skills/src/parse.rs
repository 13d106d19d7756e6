use std::collections::BTreeMap;

use anyhow::{Context, bail};

/// File name of a skill manifest.
pub const SKILL_MANIFEST: &str = "SKILL.md";

/// Frontmatter of a `SKILL.md`, validated for the two required fields.
#[derive(Debug, Clone)]
pub struct SkillManifest {
    pub name: String,
    pub description: String,
    /// Remaining frontmatter keys, scalar values stringified.
    pub extra: BTreeMap<String, String>,
}

/// Parse `SKILL.md` content into a validated manifest.
///
/// Fails on a missing/unparseable frontmatter block or an empty `name` or
/// `description`. Callers treat the failure as "not a skill", not as a
/// fatal error. The markdown body is ignored.
pub fn parse_manifest(content: &str) -> anyhow::Result<SkillManifest> {
    let (frontmatter, _body) = split_frontmatter(content)?;
    let mapping: serde_yaml::Mapping =
        serde_yaml::from_str(&frontmatter).context("invalid SKILL.md frontmatter")?;

    let mut name = None;
    let mut description = None;
    let mut extra = BTreeMap::new();

    for (key, value) in &mapping {
        let Some(key) = key.as_str() else {
            continue;
        };
        match key {
            "name" => name = scalar_to_string(value),
            "description" => description = scalar_to_string(value),
            _ => {
                if let Some(rendered) = value_to_string(value) {
                    extra.insert(key.to_string(), rendered);
                }
            },
        }
    }

    let name = name.filter(|n| !n.trim().is_empty());
    let description = description.filter(|d| !d.trim().is_empty());
    let (Some(name), Some(description)) = (name, description) else {
        bail!("SKILL.md frontmatter must contain non-empty 'name' and 'description'");
    };

    Ok(SkillManifest {
        name,
        description,
        extra,
    })
}

/// Split content at `---` delimiters into (frontmatter, body).
fn split_frontmatter(content: &str) -> anyhow::Result<(String, String)> {
    let trimmed = content.trim_start();
    if !trimmed.starts_with("---") {
        bail!("SKILL.md must start with YAML frontmatter delimited by ---");
    }

    let after_open = &trimmed[3..];
    let close_pos = after_open
        .find("\n---")
        .context("SKILL.md missing closing --- for frontmatter")?;

    let frontmatter = after_open[..close_pos].trim().to_string();
    let body = after_open[close_pos + 4..].trim().to_string();
    Ok((frontmatter, body))
}

fn scalar_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(s) => Some(s.clone()),
        serde_yaml::Value::Number(n) => Some(n.to_string()),
        serde_yaml::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Stringify a frontmatter value for the metadata mapping.
/// Scalars render plainly; sequences and mappings render as compact JSON.
fn value_to_string(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::Null => None,
        serde_yaml::Value::String(_) | serde_yaml::Value::Number(_) | serde_yaml::Value::Bool(_) => {
            scalar_to_string(value)
        },
        _ => serde_json::to_string(value).ok(),
    }
}
