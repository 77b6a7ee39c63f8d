//! # Commit CLI
//!
//! Command-line interface for the Commit collaboration backend.
//!
//! ## Usage
//!
//! ```bash
//! commit migrate         # Run database migrations
//! commit seed            # Reset and seed the database with sample data
//! commit completions zsh # Generate shell completions
//! commit --help          # Show help
//! ```

use clap::{CommandFactory as _, Parser};
use error::Result;

mod commands;

use commands::Commands;

/// Commit - team agreements, deliverables, and status tracking
#[derive(Parser, Debug)]
#[command(name = "commit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (debug, info, warn, error)
    #[arg(short = 'L', long, env = "RUST_LOG", default_value = "info")]
    log_level: String,

    /// Output format (json, pretty, compact)
    #[arg(short, long, env = "COMMIT_LOG_FORMAT", default_value = "pretty")]
    log_format: String,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.log_level, &cli.log_format, None) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        logging::error!(target: "app", error = %e, "Commit CLI failed");
        std::process::exit(1);
    }

    logging::info!(target: "app", "Commit CLI completed successfully");
}

async fn run(cli: Cli) -> Result<()> {
    logging::info!(target: "app", command = ?cli.command, "Commit CLI starting...");

    match cli.command {
        Commands::Migrate(args) => commands::migrate::migrate(args).await,
        Commands::Seed(args) => commands::seed::seed(args).await,
        Commands::Completions(args) => commands::completions::completions(args.shell, &mut Cli::command()),
    }
}
