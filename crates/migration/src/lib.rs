//! # Commit Database Migrations
//!
//! Schema migrations and seed tooling for the Commit database.
//! The schema-level guards live here: the unique signature and dependency
//! indexes, the self-edge check, and the cycle-prevention trigger that the
//! services crate maps to conflict errors.

pub use sea_orm_migration::prelude::*;

pub mod db;
pub mod seeds;

mod m20250901_000001_enable_pgcrypto;
mod m20250901_000002_create_team_members_table;
mod m20250901_000003_create_agreements_table;
mod m20250901_000004_create_agreement_signatures_table;
mod m20250901_000005_create_deliverables_table;
mod m20250901_000006_create_deliverable_dependencies_table;
mod m20250901_000007_create_updates_table;
mod m20250901_000008_create_update_reactions_table;
mod m20250901_000009_add_updated_at_triggers;
mod m20250901_000010_add_dependency_cycle_trigger;

/// Database connection alias used by migrations and seeds
pub type SeaDb = sea_orm::DatabaseConnection;

/// The main migrator that coordinates all migration operations
#[derive(Debug)]
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    /// The migrations managed by this migrator
    ///
    /// Add new migrations to this list as they are created.
    /// Migrations are executed in the order they appear in this list.
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250901_000001_enable_pgcrypto::Migration),
            Box::new(m20250901_000002_create_team_members_table::Migration),
            Box::new(m20250901_000003_create_agreements_table::Migration),
            Box::new(m20250901_000004_create_agreement_signatures_table::Migration),
            Box::new(m20250901_000005_create_deliverables_table::Migration),
            Box::new(m20250901_000006_create_deliverable_dependencies_table::Migration),
            Box::new(m20250901_000007_create_updates_table::Migration),
            Box::new(m20250901_000008_create_update_reactions_table::Migration),
            Box::new(m20250901_000009_add_updated_at_triggers::Migration),
            Box::new(m20250901_000010_add_dependency_cycle_trigger::Migration),
        ]
    }
}

/// Database connection helper for CLI usage
pub async fn connect_to_database(database_url: &str) -> Result<sea_orm::DatabaseConnection, sea_orm::DbErr> {
    sea_orm::Database::connect(database_url).await
}
