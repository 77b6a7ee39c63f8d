use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250901_000002_create_team_members_table::TeamMembers,
    m20250901_000005_create_deliverables_table::Deliverables,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Updates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Updates::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(text(Updates::Content).not_null())
                    .col(ColumnDef::new(Updates::AuthorId).uuid().null())
                    .col(ColumnDef::new(Updates::DeliverableId).uuid().null())
                    .col(boolean(Updates::IsHelpRequest).not_null().default(false))
                    .col(
                        timestamp_with_time_zone(Updates::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_updates_author_id")
                    .from(Updates::Table, Updates::AuthorId)
                    .to(TeamMembers::Table, TeamMembers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_updates_deliverable_id")
                    .from(Updates::Table, Updates::DeliverableId)
                    .to(Deliverables::Table, Deliverables::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        // Index for the activity histogram window queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_updates_created_at")
                    .table(Updates::Table)
                    .col(Updates::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Updates::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Updates {
    Table,
    Id,
    Content,
    AuthorId,
    DeliverableId,
    IsHelpRequest,
    CreatedAt,
}
