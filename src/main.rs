//! Personal Task Scheduler
//!
//! An HTTP task scheduler with recurrence rules: one-time tasks disappear
//! when completed, repeating tasks advance to their next computed date.

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Arc;
use todo_scheduler::config::Config;
use todo_scheduler::db::Database;
use todo_scheduler::server;
use todo_scheduler::service::TaskService;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

/// Personal task scheduler with recurrence rules
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on (overrides TODO_PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Path to database file (overrides TODO_DBFILE)
    #[arg(short, long)]
    database: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Logging output: 0/off, 1/stdout, 2/stderr (default), or filename
    #[arg(short, long, default_value = "2")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on --log option
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    match cli.log.as_str() {
        "0" | "off" => {
            // No logging
        }
        "1" | "stdout" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stdout)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        "2" | "stderr" => {
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(std::io::stderr)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
        filename => {
            // Log to file (append mode)
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(filename)?;
            let subscriber = FmtSubscriber::builder()
                .with_max_level(level)
                .with_writer(file)
                .with_ansi(false)
                .finish();
            tracing::subscriber::set_global_default(subscriber)?;
        }
    }

    // Environment first, CLI flags override
    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(db_file) = cli.database {
        config.db_file = db_file;
    }

    let db = Database::open(&config.db_file)?;
    info!("Database open at {}", config.db_file.display());

    let service = Arc::new(TaskService::new(db));
    let (shutdown_tx, _addr) = server::start_server(service, config.port).await?;

    tokio::signal::ctrl_c().await?;
    let _ = shutdown_tx.send(());

    Ok(())
}
