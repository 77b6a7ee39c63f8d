//! # Current User Resolution
//!
//! There is no authentication yet. The "current user" is resolved through
//! a pluggable trait so a real identity/session mechanism can replace the
//! placeholder without touching the aggregators.
//!
//! TODO: replace [`FirstTeamMember`] with a session-backed resolver before
//! any multi-user deployment; until then audit trails attribute everything
//! to the oldest roster entry.

use async_trait::async_trait;
use entity::team_members;
use error::{AppError, Result};
use sea_orm::{DbConn, EntityTrait, QueryOrder};
use uuid::Uuid;

/// Resolves the member id acting as "current user".
#[async_trait]
pub trait CurrentUserResolver: Send + Sync {
    /// Returns the current user's member id, or `None` when no identity is
    /// available (e.g. an empty roster).
    async fn resolve(&self, db: &DbConn) -> Result<Option<Uuid>>;
}

/// Placeholder resolver: the first team member in creation order.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTeamMember;

#[async_trait]
impl CurrentUserResolver for FirstTeamMember {
    async fn resolve(&self, db: &DbConn) -> Result<Option<Uuid>> {
        let first = team_members::Entity::find()
            .order_by_asc(team_members::Column::CreatedAt)
            .one(db)
            .await
            .map_err(|e| AppError::database(format!("Failed to resolve current user: {}", e)))?;

        Ok(first.map(|m| m.id))
    }
}
