//! # CLI Commands
//!
//! Implementation of CLI commands for the Commit application.

pub mod completions;
pub mod migrate;
pub mod seed;

use clap::{Args, Subcommand};

/// Available commands for the Commit CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run database migrations
    Migrate(MigrateArgs),

    /// Clear all tables and insert development sample data
    Seed(SeedArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Run migrations in dry-run mode (no changes)
    #[arg(long)]
    pub dry_run: bool,

    /// Rollback the last migration
    #[arg(long)]
    pub rollback: bool,
}

/// Arguments for the seed command
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Log each seed provider's result
    #[arg(long, default_value_t = true)]
    pub verbose: bool,
}

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
