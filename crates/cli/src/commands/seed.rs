//! # CLI Seed Command
//!
//! One-shot development fixture batch: clears every table and repopulates
//! the database with representative sample data.

use error::Result;
use tracing::info;

use crate::commands::SeedArgs;

/// Clears and seeds the database.
///
/// # Errors
///
/// Returns an error if the connection, the clear pass, or any seed
/// provider fails; the process exits non-zero in that case.
pub async fn seed(args: SeedArgs) -> Result<()> {
    info!(target: "seed", "Seeding database with sample data...");

    let db = migration::db::connect_from_env().await?;

    let results = migration::seeds::run_all_seeds(&db, args.verbose).await?;

    let total_inserted: usize = results.iter().map(|r| r.inserted_count).sum();
    info!(
        target: "seed",
        seeds = results.len(),
        inserted = total_inserted,
        "Database seeded successfully"
    );

    Ok(())
}
