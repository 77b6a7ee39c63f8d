use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250901_000005_create_deliverables_table::Deliverables;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DeliverableDependencies::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DeliverableDependencies::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(
                        ColumnDef::new(DeliverableDependencies::DeliverableId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(DeliverableDependencies::DependsOnId)
                            .uuid()
                            .not_null(),
                    )
                    .col(
                        timestamp_with_time_zone(DeliverableDependencies::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    // Self-edges are rejected at the schema level
                    .check(
                        Expr::col(DeliverableDependencies::DeliverableId)
                            .ne(Expr::col(DeliverableDependencies::DependsOnId)),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_deliverable_dependencies_deliverable_id")
                    .from(DeliverableDependencies::Table, DeliverableDependencies::DeliverableId)
                    .to(Deliverables::Table, Deliverables::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_deliverable_dependencies_depends_on_id")
                    .from(DeliverableDependencies::Table, DeliverableDependencies::DependsOnId)
                    .to(Deliverables::Table, Deliverables::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // Edge pairs are unique
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deliverable_dependencies_edge_unique")
                    .table(DeliverableDependencies::Table)
                    .col(DeliverableDependencies::DeliverableId)
                    .col(DeliverableDependencies::DependsOnId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deliverable_dependencies_deliverable_id")
                    .table(DeliverableDependencies::Table)
                    .col(DeliverableDependencies::DeliverableId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(DeliverableDependencies::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum DeliverableDependencies {
    Table,
    Id,
    DeliverableId,
    DependsOnId,
    CreatedAt,
}
