//! Quotebook CLI
//!
//! Command-line front end for a local quote list with server sync.
//!
//! # Commands
//!
//! - `show` - Display a random quote, optionally from one category
//! - `add` - Add a quote
//! - `import` / `export` - Move the list in and out as JSON
//! - `categories` - List known categories
//! - `filter` - Remember a category selection
//! - `sync` - Reconcile the list with the remote feed once
//! - `watch` - Sync on an interval until stdin closes

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use quotebook_sync_engine::{DEFAULT_ENDPOINT, DEFAULT_FETCH_LIMIT};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quote list manager with server sync.
#[derive(Parser)]
#[command(name = "quotebook")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the quote list
    #[arg(global = true, short, long, default_value = ".quotebook")]
    data_dir: PathBuf,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display a random quote
    Show {
        /// Category to draw from (defaults to the remembered filter)
        #[arg(short, long)]
        category: Option<String>,
    },

    /// Add a quote
    Add {
        /// Quote text
        text: String,

        /// Quote category
        category: String,
    },

    /// Append quotes from a JSON file
    Import {
        /// JSON file holding an array of {text, category} objects
        file: PathBuf,
    },

    /// Write the quote list as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// List known categories
    Categories,

    /// Remember a category filter ("all" clears it)
    Filter {
        /// Category name or "all"
        category: String,
    },

    /// Sync with the remote feed once
    Sync {
        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Sync periodically until stdin is closed
    Watch {
        /// Seconds between syncs
        #[arg(short, long, default_value = "30")]
        interval: u64,

        #[command(flatten)]
        remote: RemoteArgs,
    },
}

/// Options shared by the sync commands.
#[derive(clap::Args)]
struct RemoteArgs {
    /// Remote feed URL
    #[arg(short, long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Maximum number of remote quotes per sync
    #[arg(short, long, default_value_t = DEFAULT_FETCH_LIMIT)]
    limit: usize,

    /// How to settle conflicts
    #[arg(short, long, value_enum, default_value = "server")]
    policy: PolicyArg,
}

/// Conflict handling chosen on the command line.
#[derive(Clone, Copy, ValueEnum)]
enum PolicyArg {
    /// The server version always wins
    Server,
    /// The local version always wins
    Client,
    /// Ask on stdin for every conflict
    Ask,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut out = std::io::stdout();

    match cli.command {
        Commands::Show { category } => {
            let mut store = commands::open_store(&cli.data_dir)?;
            commands::show::run(&mut store, category.as_deref(), &mut rand::thread_rng(), &mut out)?;
        }
        Commands::Add { text, category } => {
            let mut store = commands::open_store(&cli.data_dir)?;
            commands::add::run(&mut store, &text, &category, &mut out)?;
        }
        Commands::Import { file } => {
            let mut store = commands::open_store(&cli.data_dir)?;
            commands::transfer::import(&mut store, &file, &mut out)?;
        }
        Commands::Export { output } => {
            let store = commands::open_store(&cli.data_dir)?;
            commands::transfer::export(&store, output.as_deref(), &mut out)?;
        }
        Commands::Categories => {
            let store = commands::open_store(&cli.data_dir)?;
            commands::categories::list(&store, &mut out)?;
        }
        Commands::Filter { category } => {
            let store = commands::open_store(&cli.data_dir)?;
            commands::categories::select(&store, &category, &mut out)?;
        }
        Commands::Sync { remote } => {
            let store = commands::open_store(&cli.data_dir)?;
            let options = remote.into_options(None);
            commands::sync::once(store, &options, &mut out)?;
        }
        Commands::Watch { interval, remote } => {
            if interval == 0 {
                return Err("Interval must be at least one second".into());
            }
            let store = commands::open_store(&cli.data_dir)?;
            let options = remote.into_options(Some(interval));
            commands::sync::watch(store, &options, std::io::stdin().lock())?;
        }
    }

    Ok(())
}

impl RemoteArgs {
    fn into_options(self, interval_secs: Option<u64>) -> commands::sync::SyncOptions {
        let mut config = quotebook_sync_engine::SyncConfig::new(self.endpoint)
            .with_fetch_limit(self.limit);
        if let Some(secs) = interval_secs {
            config = config.with_sync_interval(std::time::Duration::from_secs(secs));
        }
        commands::sync::SyncOptions {
            config,
            policy: match self.policy {
                PolicyArg::Server => commands::sync::Policy::ServerWins,
                PolicyArg::Client => commands::sync::Policy::ClientWins,
                PolicyArg::Ask => commands::sync::Policy::Ask,
            },
        }
    }
}
