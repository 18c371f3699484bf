//! folio CLI
//!
//! Command-line interface for folio - paged reading of plain-text books.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use folio_core::{CacheStore, Config, MemoryCache, Reader, UserId};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "folio - Read large text files one page at a time")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use a specific config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a text file into pages
    Paginate {
        /// Text file to paginate
        file: PathBuf,
        /// Characters per page (defaults to the configured page size)
        #[arg(short = 's', long)]
        page_size: Option<usize>,
        /// Print full page texts instead of previews
        #[arg(long)]
        full: bool,
    },
    /// Store a text file as a user's book
    Import {
        /// User the book belongs to
        #[arg(short, long)]
        user: UserId,
        /// Plain-text file to import
        file: PathBuf,
    },
    /// Show one page of a user's book
    Show {
        /// User whose book to open
        #[arg(short, long)]
        user: UserId,
        /// Page number
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (books_dir, book_file, page_size, end_signs,
        /// session_ttl_secs, book_ttl_secs)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let output = Output::new(OutputFormat::select(cli.json, cli.quiet));

    // Config commands work on the file itself
    if let Commands::Config { command } = &cli.command {
        return match command.clone() {
            Some(ConfigCommands::Show) | None => {
                commands::config::show(cli.config.as_ref(), &output)
            }
            Some(ConfigCommands::Set { key, value }) => {
                commands::config::set(key, value, cli.config.as_ref(), &output)
            }
        };
    }

    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Commands::Paginate {
            file,
            page_size,
            full,
        } => commands::paginate::run(&file, page_size, full, &config, &output),
        Commands::Import { user, file } => {
            let reader = open_reader(&config)?;
            commands::book::import(&reader, user, &file, &output).await
        }
        Commands::Show { user, page } => {
            let reader = open_reader(&config)?;
            commands::book::show(&reader, user, page, &output).await
        }
        Commands::Config { .. } => unreachable!(), // Handled above
    }
}

/// Load configuration, honoring `--config`
pub(crate) fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    }
    .context("Failed to load configuration")
}

/// Build a reader over a process-lifetime cache
fn open_reader(config: &Config) -> Result<Reader> {
    let cache: Arc<dyn CacheStore> = Arc::new(MemoryCache::new());
    Reader::from_config(cache, config).context("Failed to set up reader")
}

/// Send tracing output to stderr, filtered by RUST_LOG when set
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
