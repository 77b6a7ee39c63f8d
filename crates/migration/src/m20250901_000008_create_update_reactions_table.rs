use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250901_000002_create_team_members_table::TeamMembers,
    m20250901_000007_create_updates_table::Updates,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(UpdateReactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(UpdateReactions::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(UpdateReactions::UpdateId).uuid().not_null())
                    .col(ColumnDef::new(UpdateReactions::MemberId).uuid().not_null())
                    .col(string(UpdateReactions::ReactionType).not_null())
                    .col(
                        timestamp_with_time_zone(UpdateReactions::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_update_reactions_update_id")
                    .from(UpdateReactions::Table, UpdateReactions::UpdateId)
                    .to(Updates::Table, Updates::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_update_reactions_member_id")
                    .from(UpdateReactions::Table, UpdateReactions::MemberId)
                    .to(TeamMembers::Table, TeamMembers::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_update_reactions_unique")
                    .table(UpdateReactions::Table)
                    .col(UpdateReactions::UpdateId)
                    .col(UpdateReactions::MemberId)
                    .col(UpdateReactions::ReactionType)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UpdateReactions::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum UpdateReactions {
    Table,
    Id,
    UpdateId,
    MemberId,
    ReactionType,
    CreatedAt,
}
