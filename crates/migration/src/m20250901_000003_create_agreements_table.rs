use sea_orm_migration::{prelude::*, schema::*, sea_query::extension::postgres::Type};

use crate::m20250901_000002_create_team_members_table::TeamMembers;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create agreement_status enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(AgreementStatus::Table)
                    .values(vec![
                        AgreementStatus::Pending,
                        AgreementStatus::Active,
                        AgreementStatus::Archived,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Agreements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Agreements::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(string(Agreements::Title).not_null())
                    .col(text_null(Agreements::Description))
                    .col(
                        enumeration(
                            Agreements::Status,
                            AgreementStatus::Table,
                            vec![
                                AgreementStatus::Pending,
                                AgreementStatus::Active,
                                AgreementStatus::Archived,
                            ],
                        )
                        .default("pending"),
                    )
                    .col(ColumnDef::new(Agreements::CreatedBy).uuid().null())
                    .col(
                        timestamp_with_time_zone(Agreements::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Agreements::UpdatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Creator reference survives member removal as NULL
        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_agreements_created_by")
                    .from(Agreements::Table, Agreements::CreatedBy)
                    .to(TeamMembers::Table, TeamMembers::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                    .to_owned(),
            )
            .await?;

        // Index for newest-first listing
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agreements_created_at")
                    .table(Agreements::Table)
                    .col(Agreements::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Agreements::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(AgreementStatus::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum Agreements {
    Table,
    Id,
    Title,
    Description,
    Status,
    CreatedBy,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum AgreementStatus {
    #[sea_orm(iden = "agreement_status")]
    Table,
    Pending,
    Active,
    Archived,
}
