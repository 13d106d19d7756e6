//! Source string resolution.
//!
//! Turns the user-supplied source argument into a canonical fetch URL plus
//! an optional subpath, without performing any network I/O.

use std::path::{Component, Path};

use anyhow::{Context, bail};

use crate::types::{ParsedSource, SourceKind};

const SCHEMES: &[&str] = &["https://", "http://", "ssh://", "git://"];

/// Resolve a source string into a [`ParsedSource`].
///
/// Recognized shapes, tried in order: `owner/repo` shorthand, shorthand
/// with a trailing subpath, full URLs (including scp-style `git@host:`),
/// and local filesystem paths.
pub fn resolve(input: &str) -> anyhow::Result<ParsedSource> {
    let input = input.trim();
    if input.is_empty() {
        bail!("source must not be empty");
    }

    if input.starts_with("git@") {
        return resolve_scp(input);
    }
    if SCHEMES.iter().any(|s| input.starts_with(s)) {
        return resolve_url(input);
    }

    if looks_like_path(input) {
        return resolve_local(input);
    }

    let segments: Vec<&str> = input
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    // A host-like first token ("gitlab.com/owner/repo") is a URL with the
    // scheme left off, not a GitHub shorthand.
    if segments.len() >= 2 && segments[0].contains('.') {
        return resolve_url(&format!("https://{input}"));
    }

    match segments.len() {
        0 | 1 if Path::new(input).exists() => resolve_local(input),
        0 | 1 => bail!("unrecognized source '{input}': expected 'owner/repo', a git URL, or a path"),
        2 => Ok(ParsedSource {
            kind: SourceKind::Github,
            url: format!("https://github.com/{}/{}", segments[0], trim_git(segments[1])),
            subpath: None,
        }),
        _ => Ok(ParsedSource {
            kind: SourceKind::Github,
            url: format!("https://github.com/{}/{}", segments[0], trim_git(segments[1])),
            subpath: Some(validate_subpath(&segments[2..].join("/"))?),
        }),
    }
}

fn resolve_url(input: &str) -> anyhow::Result<ParsedSource> {
    let parsed = url::Url::parse(input.trim_end_matches('/'))
        .with_context(|| format!("invalid source URL '{input}'"))?;
    let host = parsed
        .host_str()
        .with_context(|| format!("source URL '{input}' has no host"))?;

    let segments: Vec<String> = parsed
        .path_segments()
        .map(|s| {
            s.filter(|p| !p.is_empty())
                .map(ToString::to_string)
                .collect()
        })
        .unwrap_or_default();
    if segments.len() < 2 {
        bail!("source URL '{input}' is missing the owner/repo path");
    }

    let authority = match parsed.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    let url = format!(
        "{}://{}/{}/{}",
        parsed.scheme(),
        authority,
        segments[0],
        trim_git(&segments[1])
    );

    let subpath = if segments.len() > 2 {
        Some(validate_subpath(&segments[2..].join("/"))?)
    } else {
        None
    };

    Ok(ParsedSource {
        kind: classify_host(host),
        url,
        subpath,
    })
}

/// scp-style `git@host:owner/repo[.git][/sub/path]`.
fn resolve_scp(input: &str) -> anyhow::Result<ParsedSource> {
    let rest = &input["git@".len()..];
    let (host, path) = rest
        .split_once(':')
        .with_context(|| format!("invalid scp-style source '{input}'"))?;
    if host.is_empty() {
        bail!("invalid scp-style source '{input}': empty host");
    }

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() < 2 {
        bail!("source '{input}' is missing the owner/repo path");
    }

    let subpath = if segments.len() > 2 {
        Some(validate_subpath(&segments[2..].join("/"))?)
    } else {
        None
    };

    Ok(ParsedSource {
        kind: classify_host(host),
        url: format!("git@{host}:{}/{}.git", segments[0], trim_git(segments[1])),
        subpath,
    })
}

fn resolve_local(input: &str) -> anyhow::Result<ParsedSource> {
    Ok(ParsedSource {
        kind: SourceKind::Local,
        url: input.to_string(),
        subpath: None,
    })
}

fn looks_like_path(input: &str) -> bool {
    input.starts_with('/')
        || input.starts_with("./")
        || input.starts_with("../")
        || input.starts_with('~')
}

fn classify_host(host: &str) -> SourceKind {
    let host = host.to_ascii_lowercase();
    if host.contains("github") {
        SourceKind::Github
    } else if host.contains("gitlab") {
        SourceKind::Gitlab
    } else {
        SourceKind::Git
    }
}

fn trim_git(repo: &str) -> &str {
    repo.strip_suffix(".git").unwrap_or(repo)
}

/// Validate that a subpath is relative and stays inside the repository.
/// Returns the normalized form.
pub fn validate_subpath(subpath: &str) -> anyhow::Result<String> {
    let trimmed = subpath.trim_matches('/');
    if trimmed.is_empty() {
        bail!("subpath must not be empty");
    }
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(_) | Component::CurDir => {},
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                bail!("subpath '{subpath}' escapes the repository root");
            },
        }
    }
    Ok(trimmed.to_string())
}
