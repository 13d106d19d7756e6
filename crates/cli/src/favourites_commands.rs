use {anyhow::bail, clap::Subcommand};

use hoist_skills::favourites::FavouritesStore;

#[derive(Subcommand)]
pub enum FavouritesAction {
    /// Bookmark a repository for later installs.
    Add {
        /// Repository in owner/repo form or a git URL.
        repo: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Remove a bookmark by id or repo.
    Remove { key: String },
    /// List bookmarked repositories.
    List,
}

pub fn handle_favourites(action: FavouritesAction) -> anyhow::Result<()> {
    let store = FavouritesStore::new(FavouritesStore::default_path());

    match action {
        FavouritesAction::Add { repo, description } => {
            let favourite = store.add(&repo, &description)?;
            println!("Added '{}' ({}).", favourite.repo, favourite.id);
        },
        FavouritesAction::Remove { key } => {
            if store.remove(&key)? {
                println!("Removed '{key}'.");
            } else {
                bail!("no favourite matching '{key}'");
            }
        },
        FavouritesAction::List => {
            let favourites = store.list()?;
            if favourites.is_empty() {
                println!("No favourites yet. Add one with: hoist favourites add <owner/repo>");
                return Ok(());
            }
            for favourite in favourites {
                if favourite.description.is_empty() {
                    println!("  {}  {}", favourite.id, favourite.repo);
                } else {
                    println!("  {}  {} — {}", favourite.id, favourite.repo, favourite.description);
                }
            }
        },
    }
    Ok(())
}
