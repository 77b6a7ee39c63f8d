//! Team Members Entity
//!
//! Represents the members of the team. Identity is immutable once created;
//! members are referenced by deliverables (owner), agreements (creator),
//! signatures, and updates (author).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "team_members")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id:         uuid::Uuid,
    pub name:       String,
    pub email:      String,
    pub avatar_url: Option<String>,
    pub role:       MemberRole,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::agreement_signatures::Entity")]
    AgreementSignatures,
    #[sea_orm(has_many = "super::deliverables::Entity")]
    OwnedDeliverables,
    #[sea_orm(has_many = "super::updates::Entity")]
    Updates,
}

impl Related<super::agreement_signatures::Entity> for Entity {
    fn to() -> RelationDef { Relation::AgreementSignatures.def() }
}

impl Related<super::deliverables::Entity> for Entity {
    fn to() -> RelationDef { Relation::OwnedDeliverables.def() }
}

impl Related<super::updates::Entity> for Entity {
    fn to() -> RelationDef { Relation::Updates.def() }
}

impl ActiveModelBehavior for ActiveModel {}

/// Team member role enumeration
#[derive(Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "member_role")]
pub enum MemberRole {
    /// Team lead
    #[sea_orm(string_value = "lead")]
    Lead,
    /// Regular member
    #[sea_orm(string_value = "member")]
    Member,
}

impl std::fmt::Display for MemberRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MemberRole::Lead => write!(f, "lead"),
            MemberRole::Member => write!(f, "member"),
        }
    }
}
