//! Deliverables Entity
//!
//! A trackable unit of work with an owner, deadline, and progress. Progress
//! and status are kept consistent by the progress-update path in the
//! services crate; the schema only enforces the 0..=100 progress range.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deliverables")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id:          uuid::Uuid,
    pub title:       String,
    pub description: Option<String>,
    pub owner_id:    Option<uuid::Uuid>,
    pub deadline:    Option<chrono::NaiveDate>,
    pub progress:    i32,
    pub status:      DeliverableStatus,
    pub created_at:  chrono::DateTime<chrono::Utc>,
    pub updated_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team_members::Entity",
        from = "Column::OwnerId",
        to = "super::team_members::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Owner,
    #[sea_orm(has_many = "super::updates::Entity")]
    Updates,
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Owner.def() }
}

impl Related<super::updates::Entity> for Entity {
    fn to() -> RelationDef { Relation::Updates.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Deliverable health status
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deliverable_status")]
pub enum DeliverableStatus {
    /// Not started yet
    #[sea_orm(string_value = "upcoming")]
    Upcoming,
    /// Actively worked on
    #[sea_orm(string_value = "in-progress")]
    InProgress,
    /// Behind schedule relative to its deadline
    #[sea_orm(string_value = "at-risk")]
    AtRisk,
    /// Done
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl std::fmt::Display for DeliverableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliverableStatus::Upcoming => write!(f, "upcoming"),
            DeliverableStatus::InProgress => write!(f, "in-progress"),
            DeliverableStatus::AtRisk => write!(f, "at-risk"),
            DeliverableStatus::Completed => write!(f, "completed"),
        }
    }
}
