mod favourites_commands;
mod install_commands;
mod search_commands;

use {
    clap::{Parser, Subcommand},
    tracing::debug,
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "hoist", about = "hoist — install agent skills from any git repository")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Custom config directory (overrides default ~/.config/hoist/).
    #[arg(long, global = true, env = "HOIST_CONFIG_DIR")]
    config_dir: Option<std::path::PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Discover skills in a repository and install them.
    Add(install_commands::AddArgs),
    /// Show skills currently installed for each agent.
    List(install_commands::ListArgs),
    /// Search the hosted skill catalog.
    Search {
        query: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Manage favourite repositories.
    Favourites {
        #[command(subcommand)]
        action: favourites_commands::FavouritesAction,
    },
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    if let Some(ref dir) = cli.config_dir {
        hoist_config::set_config_dir(dir.clone());
    }

    debug!(version = env!("CARGO_PKG_VERSION"), "hoist starting");

    match cli.command {
        Commands::Add(args) => install_commands::handle_add(args).await,
        Commands::List(args) => install_commands::handle_list(args).await,
        Commands::Search { query, page } => search_commands::handle_search(&query, page).await,
        Commands::Favourites { action } => favourites_commands::handle_favourites(action),
    }
}
