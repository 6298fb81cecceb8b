use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use bookshelf_cli::{App, Settings, UreqTransport};
use bookshelf_core::{BooksClient, HttpBookSearch, RedbFavoritesStore};

#[derive(Parser)]
#[command(name = "bookshelf", version, about = "Search books and keep a list of favorites")]
struct Cli {
    /// Log at debug level regardless of configuration
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search the catalog and optionally star results
    Search {
        /// Search terms
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Save result row N (1-based) as a favorite; repeatable
        #[arg(long, value_name = "N")]
        save: Vec<usize>,
    },
    /// Show or edit saved favorites
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesAction>,
    },
}

#[derive(Subcommand)]
enum FavoritesAction {
    /// List saved favorites (default)
    List,
    /// Delete the favorite stored under KEY
    Remove { key: u64 },
}

fn init_tracing(settings: &Settings, verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&settings.telemetry.log_filter))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .ok();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::load().with_context(|| "failed to load bookshelf settings")?;
    init_tracing(&settings, cli.verbose);

    let store = RedbFavoritesStore::open(&settings.storage.path).with_context(|| {
        format!(
            "failed to open favorites store at {}",
            settings.storage.path.display()
        )
    })?;
    let search = HttpBookSearch::new(BooksClient::new(&settings.api.base_url), UreqTransport::new());
    let mut app = App::new(search, store);

    let screen = match cli.command {
        Command::Search { query, save } => {
            app.on_search_change(|state| {
                if state.is_loading() {
                    tracing::info!(query = %state.query, "searching");
                }
            });
            app.search(&query.join(" "), &save)?
        }
        Command::Favorites { action } => match action.unwrap_or(FavoritesAction::List) {
            FavoritesAction::List => app.list_favorites(),
            FavoritesAction::Remove { key } => app.remove_favorite(key)?,
        },
    };

    print!("{screen}");
    Ok(())
}
