//! Update Reactions Entity
//!
//! Emoji-style reactions to status updates, unique per
//! (update, member, reaction type).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "update_reactions")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id:            uuid::Uuid,
    pub update_id:     uuid::Uuid,
    pub member_id:     uuid::Uuid,
    pub reaction_type: String,
    pub created_at:    chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::updates::Entity",
        from = "Column::UpdateId",
        to = "super::updates::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Update,
    #[sea_orm(
        belongs_to = "super::team_members::Entity",
        from = "Column::MemberId",
        to = "super::team_members::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Member,
}

impl Related<super::updates::Entity> for Entity {
    fn to() -> RelationDef { Relation::Update.def() }
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Member.def() }
}

impl ActiveModelBehavior for ActiveModel {}
