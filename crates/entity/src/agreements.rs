//! Agreements Entity
//!
//! A team commitment that becomes active once every current member has
//! signed it. Only status and timestamps are updated in place.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "agreements")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id:          uuid::Uuid,
    pub title:       String,
    pub description: Option<String>,
    pub status:      AgreementStatus,
    pub created_by:  Option<uuid::Uuid>,
    pub created_at:  chrono::DateTime<chrono::Utc>,
    pub updated_at:  chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::agreement_signatures::Entity")]
    Signatures,
    #[sea_orm(
        belongs_to = "super::team_members::Entity",
        from = "Column::CreatedBy",
        to = "super::team_members::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Creator,
}

impl Related<super::agreement_signatures::Entity> for Entity {
    fn to() -> RelationDef { Relation::Signatures.def() }
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Creator.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Agreement lifecycle status
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "agreement_status")]
pub enum AgreementStatus {
    /// Collecting signatures
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Fully signed by the membership
    #[sea_orm(string_value = "active")]
    Active,
    /// Retired
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl std::fmt::Display for AgreementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgreementStatus::Pending => write!(f, "pending"),
            AgreementStatus::Active => write!(f, "active"),
            AgreementStatus::Archived => write!(f, "archived"),
        }
    }
}
