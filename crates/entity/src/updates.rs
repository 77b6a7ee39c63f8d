//! Updates Entity
//!
//! Status posts from team members, optionally linked to a deliverable.
//! Append-only; there is no edit or delete path.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "updates")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id:              uuid::Uuid,
    pub content:         String,
    pub author_id:       Option<uuid::Uuid>,
    pub deliverable_id:  Option<uuid::Uuid>,
    pub is_help_request: bool,
    pub created_at:      chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::team_members::Entity",
        from = "Column::AuthorId",
        to = "super::team_members::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Author,
    #[sea_orm(
        belongs_to = "super::deliverables::Entity",
        from = "Column::DeliverableId",
        to = "super::deliverables::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    Deliverable,
    #[sea_orm(has_many = "super::update_reactions::Entity")]
    Reactions,
}

impl Related<super::team_members::Entity> for Entity {
    fn to() -> RelationDef { Relation::Author.def() }
}

impl Related<super::deliverables::Entity> for Entity {
    fn to() -> RelationDef { Relation::Deliverable.def() }
}

impl Related<super::update_reactions::Entity> for Entity {
    fn to() -> RelationDef { Relation::Reactions.def() }
}

impl ActiveModelBehavior for ActiveModel {}
