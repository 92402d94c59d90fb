//! Miyo CLI - Command-line interface for the Miyo reader's storage

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "miyo")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Document directory holding the app root
    #[arg(long, global = true, env = "MIYO_DOCUMENT_DIR")]
    root: Option<PathBuf>,

    /// Temporary directory for scratch space
    #[arg(long, global = true, env = "MIYO_TEMP_DIR")]
    temp_dir: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the storage directory tree
    Init,

    /// Display storage information
    Info {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Import a book file into the library
    Import {
        /// Book file to import
        input: PathBuf,

        /// Book id (directory name in the library)
        #[arg(long)]
        id: String,

        /// File name to store the content under
        #[arg(long)]
        file_name: Option<String>,

        /// JSON file with the book's metadata
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Export a stored book file
    Export {
        /// Book id
        id: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,

        /// Stored file name to export
        #[arg(long)]
        file_name: Option<String>,
    },

    /// List books in the library
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a book and all its files
    Remove {
        /// Book id
        id: String,
    },

    /// Print a book's metadata
    Metadata {
        /// Book id
        id: String,
    },

    /// Show or change user preferences
    Prefs {
        /// Set a preference (key=value); may be repeated
        #[arg(long, value_name = "KEY=VALUE", value_parser = commands::parse_assignment)]
        set: Vec<(String, String)>,

        /// Restore default preferences
        #[arg(long, conflicts_with = "set")]
        reset: bool,
    },

    /// Manage the cache
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },

    /// Back up the database file
    Backup {
        /// Database file name inside the database directory
        #[arg(long)]
        database: Option<String>,
    },

    /// List database backups
    Backups,
}

#[derive(Subcommand)]
enum CacheCommand {
    /// Delete everything in the cache
    Clear,

    /// Delete cache entries older than the given age
    Cleanup {
        /// Maximum age in days (defaults to the configured value)
        #[arg(long)]
        max_age_days: Option<u32>,
    },

    /// Show cache size
    Usage,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "miyo_cli=debug,miyo_core=debug"
    } else {
        "miyo_cli=info"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let storage = commands::open_storage(
        cli.config.as_deref(),
        cli.root.as_deref(),
        cli.temp_dir.as_deref(),
    )
    .await?;

    match cli.command {
        Commands::Init => commands::init(&storage),

        Commands::Info { json } => commands::info(&storage, json).await,

        Commands::Import {
            input,
            id,
            file_name,
            metadata,
        } => {
            commands::import(
                &storage,
                &input,
                &id,
                file_name.as_deref(),
                metadata.as_deref(),
            )
            .await
        }

        Commands::Export {
            id,
            output,
            file_name,
        } => commands::export(&storage, &id, &output, file_name.as_deref()).await,

        Commands::List { json } => commands::list(&storage, json).await,

        Commands::Remove { id } => commands::remove(&storage, &id).await,

        Commands::Metadata { id } => commands::metadata(&storage, &id).await,

        Commands::Prefs { set, reset } => commands::prefs(&storage, &set, reset).await,

        Commands::Cache { command } => match command {
            CacheCommand::Clear => commands::cache_clear(&storage).await,
            CacheCommand::Cleanup { max_age_days } => {
                commands::cache_cleanup(&storage, max_age_days).await
            }
            CacheCommand::Usage => commands::cache_usage(&storage).await,
        },

        Commands::Backup { database } => commands::backup(&storage, database.as_deref()).await,

        Commands::Backups => commands::backups(&storage).await,
    }
}
