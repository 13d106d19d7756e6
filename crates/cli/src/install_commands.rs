use std::{
    collections::HashSet,
    io::Write,
    path::PathBuf,
};

use {
    anyhow::bail,
    clap::Args,
};

use hoist_skills::{
    agents::{self, AgentKind},
    discover,
    fetch::{ClonedRepo, GitFetcher, RepoFetcher},
    install,
    source,
    types::{InstallScope, Skill, SourceKind},
};

#[derive(Args)]
pub struct AddArgs {
    /// Repository shorthand (owner/repo), git URL, or local path.
    pub source: String,

    /// Install into the per-user global skills directories.
    #[arg(long, default_value_t = false)]
    pub global: bool,

    /// Agents to install for (defaults to every detected agent).
    #[arg(long = "agent", value_name = "NAME")]
    pub agents: Vec<String>,

    /// Only install the named skills.
    #[arg(long = "skill", value_name = "NAME")]
    pub skills: Vec<String>,

    /// List the discovered skills without installing anything.
    #[arg(long, default_value_t = false)]
    pub list: bool,

    /// Skip the confirmation prompt.
    #[arg(short = 'y', long, default_value_t = false)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ListArgs {
    /// Agents to inspect (defaults to every detected agent).
    #[arg(long = "agent", value_name = "NAME")]
    pub agents: Vec<String>,

    /// Inspect the per-user global skills directories.
    #[arg(long, default_value_t = false)]
    pub global: bool,
}

pub async fn handle_add(args: AddArgs) -> anyhow::Result<()> {
    let parsed = source::resolve(&args.source)?;
    let agents = resolve_agents(&args.agents)?;
    let scope = scope_for(args.global);

    // A dropped ClonedRepo removes its directory, so early `?` returns
    // below never leak the checkout.
    let clone: Option<ClonedRepo>;
    let root: PathBuf;
    if parsed.kind == SourceKind::Local {
        root = expand_home(&parsed.url);
        clone = None;
    } else {
        let repo = GitFetcher.fetch(&parsed.url).await?;
        root = repo.path().to_path_buf();
        clone = Some(repo);
    }

    let catalog = discover::discover(&root, parsed.subpath.as_deref()).await?;
    if catalog.is_empty() {
        bail!("no skills found in '{}'", args.source);
    }
    let selected = select_skills(catalog, &args.skills)?;

    if args.list {
        print_catalog(&selected, &agents, scope);
        if let Some(repo) = clone {
            repo.cleanup()?;
        }
        return Ok(());
    }

    let agent_names: Vec<&str> = agents.iter().map(|a| a.display_name()).collect();
    println!(
        "Installing {} skill(s) for {} ({} scope):",
        selected.len(),
        agent_names.join(", "),
        match scope {
            InstallScope::Project => "project",
            InstallScope::Global => "global",
        }
    );
    print_catalog(&selected, &agents, scope);

    if !args.yes && !confirm("Proceed?")? {
        println!("Aborted.");
        return Ok(());
    }

    let outcomes = install::install_all(&selected, &agents, scope).await;
    if let Some(repo) = clone {
        repo.cleanup()?;
    }

    let mut failed = 0;
    for outcome in &outcomes {
        if outcome.success {
            println!(
                "  installed '{}' for {} -> {}",
                outcome.skill,
                outcome.agent,
                outcome.path.display()
            );
        } else {
            failed += 1;
            eprintln!(
                "  FAILED '{}' for {}: {}",
                outcome.skill,
                outcome.agent,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }
    if failed > 0 {
        bail!("{failed} of {} installation(s) failed", outcomes.len());
    }
    Ok(())
}

pub async fn handle_list(args: ListArgs) -> anyhow::Result<()> {
    let agents = resolve_agents(&args.agents)?;
    let scope = scope_for(args.global);

    for agent in agents {
        let dir = install::skills_dir(agent, scope)?;
        println!("{} ({})", agent.display_name(), dir.display());

        let mut children: Vec<PathBuf> = match std::fs::read_dir(&dir) {
            Ok(entries) => entries
                .flatten()
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect(),
            Err(_) => Vec::new(),
        };
        children.sort();

        if children.is_empty() {
            println!("  (none)");
            continue;
        }
        for child in children {
            if let Some(name) = child.file_name().and_then(|n| n.to_str()) {
                println!("  {name}");
            }
        }
    }
    Ok(())
}

fn scope_for(global: bool) -> InstallScope {
    if global {
        InstallScope::Global
    } else {
        InstallScope::Project
    }
}

/// Explicit agent names, or every detected agent when none are given.
fn resolve_agents(requested: &[String]) -> anyhow::Result<Vec<AgentKind>> {
    if requested.is_empty() {
        let detected = agents::detect_installed();
        if detected.is_empty() {
            bail!("no supported agents detected; pass --agent to choose one explicitly");
        }
        return Ok(detected);
    }

    let mut out = Vec::new();
    for name in requested {
        let agent: AgentKind = name.parse()?;
        if !out.contains(&agent) {
            out.push(agent);
        }
    }
    Ok(out)
}

/// Narrow the catalog to the requested skill names. Requesting a name that
/// matches nothing is a hard failure; a name shared by several discovered
/// skills selects all of them.
fn select_skills(catalog: Vec<Skill>, requested: &[String]) -> anyhow::Result<Vec<Skill>> {
    if requested.is_empty() {
        return Ok(catalog);
    }

    let mut seen: HashSet<PathBuf> = HashSet::new();
    let mut selected = Vec::new();
    for name in requested {
        let mut matched = false;
        for skill in catalog.iter().filter(|s| &s.name == name) {
            matched = true;
            if seen.insert(skill.path.clone()) {
                selected.push(skill.clone());
            }
        }
        if !matched {
            let available: Vec<&str> = catalog.iter().map(|s| s.name.as_str()).collect();
            bail!(
                "skill '{name}' not found in source (available: {})",
                available.join(", ")
            );
        }
    }
    Ok(selected)
}

fn print_catalog(skills: &[Skill], agents: &[AgentKind], scope: InstallScope) {
    let names = discover::display_names(skills);
    for (skill, display) in skills.iter().zip(names) {
        let installed = agents
            .iter()
            .any(|agent| install::is_installed(&skill.name, *agent, scope));
        let marker = if installed { " (installed)" } else { "" };
        println!("  {display} — {}{marker}", skill.description);
    }
}

fn confirm(prompt: &str) -> anyhow::Result<bool> {
    print!("{prompt} [y/N] ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(matches!(
        line.trim().to_ascii_lowercase().as_str(),
        "y" | "yes"
    ))
}

/// Expand a leading `~` to the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~") {
        if let Some(home) = hoist_config::home_dir() {
            return home.join(rest.trim_start_matches('/'));
        }
    }
    PathBuf::from(path)
}
