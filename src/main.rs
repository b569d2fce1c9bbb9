use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use trawl::commands::{handle_load_registry, handle_run, handle_seed};
use trawl::db::{create_pool, run_migrations};

#[derive(Parser)]
#[command(name = "trawl")]
#[command(about = "Fishing vessel registry and voyage tracking service")]
struct Cli {
    /// SQLite database path
    #[arg(long, env = "DATABASE_URL", default_value = "trawl.db")]
    database_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the HTTP API
    Run {
        /// Interface to bind
        #[arg(long, env = "TRAWL_INTERFACE", default_value = "127.0.0.1")]
        interface: String,

        /// Port to listen on
        #[arg(long, env = "TRAWL_PORT", default_value_t = 8080)]
        port: u16,

        /// Root of the read-only track archive tree
        #[arg(long, env = "TRACK_ARCHIVE_ROOT", default_value = "track-archive")]
        archive_root: PathBuf,

        /// Root directory for stored photo and file uploads
        #[arg(long, env = "UPLOADS_ROOT", default_value = "uploads")]
        uploads_root: PathBuf,
    },
    /// Bulk-load a vessel census CSV into the registry
    LoadRegistry {
        /// Path to the census CSV file
        file: PathBuf,

        /// Replace the existing census snapshot instead of keeping it
        #[arg(long)]
        force: bool,
    },
    /// Insert sample voyages when the ledger is empty
    Seed,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let pool = create_pool(&cli.database_url)?;
    run_migrations(&pool)?;

    match cli.command {
        Commands::Run {
            interface,
            port,
            archive_root,
            uploads_root,
        } => handle_run(interface, port, archive_root, uploads_root, pool).await,
        Commands::LoadRegistry { file, force } => handle_load_registry(file, force, pool).await,
        Commands::Seed => handle_seed(pool).await,
    }
}
