use sea_orm_migration::{prelude::*, schema::*, sea_query::extension::postgres::Type};

use crate::m20250901_000002_create_team_members_table::TeamMembers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create deliverable_status enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(DeliverableStatus::Table)
                    .values(vec![
                        DeliverableStatus::Upcoming,
                        DeliverableStatus::InProgress,
                        DeliverableStatus::AtRisk,
                        DeliverableStatus::Completed,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Deliverables::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Deliverables::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(string(Deliverables::Title).not_null())
                    .col(text_null(Deliverables::Description))
                    .col(ColumnDef::new(Deliverables::OwnerId).uuid().null())
                    .col(ColumnDef::new(Deliverables::Deadline).date().null())
                    .col(
                        integer(Deliverables::Progress)
                            .not_null()
                            .default(0)
                            .check(Expr::col(Deliverables::Progress).between(0, 100)),
                    )
                    .col(
                        enumeration(
                            Deliverables::Status,
                            DeliverableStatus::Table,
                            vec![
                                DeliverableStatus::Upcoming,
                                DeliverableStatus::InProgress,
                                DeliverableStatus::AtRisk,
                                DeliverableStatus::Completed,
                            ],
                        )
                        .default("upcoming"),
                    )
                    .col(
                        timestamp_with_time_zone(Deliverables::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Deliverables::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_deliverables_owner_id")
                    .from(Deliverables::Table, Deliverables::OwnerId)
                    .to(TeamMembers::Table, TeamMembers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        // Index for workload queries
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_deliverables_owner_id")
                    .table(Deliverables::Table)
                    .col(Deliverables::OwnerId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Deliverables::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(DeliverableStatus::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Deliverables {
    Table,
    Id,
    Title,
    Description,
    OwnerId,
    Deadline,
    Progress,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum DeliverableStatus {
    #[sea_orm(iden = "deliverable_status")]
    Table,
    Upcoming,
    #[sea_orm(iden = "in-progress")]
    InProgress,
    #[sea_orm(iden = "at-risk")]
    AtRisk,
    Completed,
}
