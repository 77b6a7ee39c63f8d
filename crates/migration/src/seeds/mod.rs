//! # Seed Data Management
//!
//! Development fixtures for the Commit database: a one-shot batch that
//! clears every table and repopulates it with a representative team,
//! agreements with partial signature coverage, deliverables, and a few
//! weeks of update history biased toward recent days.

use ::error::{AppError, SeedResult};
use sea_orm::ConnectionTrait;

use crate::SeaDb;

mod agreements;
mod deliverables;
mod team_members;
mod updates;

pub use agreements::AgreementSeed;
pub use deliverables::DeliverableSeed;
pub use team_members::TeamMemberSeed;
pub use updates::UpdateSeed;

/// Trait for seed data providers
///
/// Implement this trait to provide seed data for the database.
#[async_trait::async_trait]
pub trait SeedProvider {
    /// The name of this seed
    fn name(&self) -> &str;

    /// Runs the seed operation
    ///
    /// # Errors
    ///
    /// Returns an error if the seed operation fails.
    async fn run(&self, db: &SeaDb) -> Result<SeedResult, AppError>;
}

/// Tables in delete order (children before parents).
const CLEAR_ORDER: [&str; 7] = [
    "update_reactions",
    "updates",
    "deliverable_dependencies",
    "deliverables",
    "agreement_signatures",
    "agreements",
    "team_members",
];

/// Clears all seeded tables so the batch starts from a blank slate.
///
/// # Errors
///
/// Returns an error if any delete fails.
pub async fn clear_all_tables(db: &SeaDb) -> Result<(), AppError> {
    for table in CLEAR_ORDER {
        db.execute_unprepared(&format!("DELETE FROM {}", table))
            .await
            .map_err(|e| AppError::database(format!("Failed to clear {}: {}", table, e)))?;
        tracing::debug!(table = %table, "Table cleared");
    }
    Ok(())
}

/// Runs all registered seed providers in dependency order.
///
/// # Errors
///
/// Returns an error if clearing fails or any provider fails; providers run
/// in order and the first failure aborts the batch.
pub async fn run_all_seeds(db: &SeaDb, verbose: bool) -> Result<Vec<SeedResult>, AppError> {
    clear_all_tables(db).await?;

    let providers: Vec<Box<dyn SeedProvider + Send + Sync>> = vec![
        Box::new(TeamMemberSeed),
        Box::new(AgreementSeed),
        Box::new(DeliverableSeed),
        Box::new(UpdateSeed),
    ];

    let mut results = Vec::new();
    for provider in providers {
        let result = provider.run(db).await?;
        if verbose {
            tracing::info!(
                seed = %result.seed_name,
                inserted = result.inserted_count,
                duration_ms = result.duration_ms,
                "Seed completed"
            );
        }
        results.push(result);
    }

    Ok(results)
}
