//! Deliverable Dependencies Entity
//!
//! A directed edge "deliverable_id depends on depends_on_id". The schema
//! enforces edge uniqueness and rejects self-edges; a database trigger
//! rejects inserts that would close a cycle.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "deliverable_dependencies")]
pub struct Model {
    #[sea_orm(primary_key, column_type = "Uuid")]
    pub id:             uuid::Uuid,
    pub deliverable_id: uuid::Uuid,
    pub depends_on_id:  uuid::Uuid,
    pub created_at:     chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::deliverables::Entity",
        from = "Column::DeliverableId",
        to = "super::deliverables::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Deliverable,
    #[sea_orm(
        belongs_to = "super::deliverables::Entity",
        from = "Column::DependsOnId",
        to = "super::deliverables::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    DependsOn,
}

impl ActiveModelBehavior for ActiveModel {}
