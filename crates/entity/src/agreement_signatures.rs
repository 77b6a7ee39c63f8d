//! Agreement Signatures Entity
//!
//! One row per (agreement, member) pair. The unique index on that pair is
//! the authoritative duplicate-signature guard; application code treats its
//! own pre-insert check as advisory.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "agreement_signatures")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id:           uuid::Uuid,
    pub agreement_id: uuid::Uuid,
    pub member_id:    uuid::Uuid,
    pub signed_at:    chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::agreements::Entity",
        from = "Column::AgreementId",
        to = "super::agreements::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Agreement,
    #[sea_orm(
        belongs_to = "super::team_members::Entity",
        from = "Column::MemberId",
        to = "super::team_members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::agreements::Entity> for Entity {
    fn to() -> RelationDef { Relation::Agreement.def() }
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Member.def() }
}

impl ActiveModelBehavior for ActiveModel {}
