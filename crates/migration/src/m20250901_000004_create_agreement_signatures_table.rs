use sea_orm_migration::{prelude::*, schema::*};

use crate::{
    m20250901_000002_create_team_members_table::TeamMembers,
    m20250901_000003_create_agreements_table::Agreements,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AgreementSignatures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AgreementSignatures::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(ColumnDef::new(AgreementSignatures::AgreementId).uuid().not_null())
                    .col(ColumnDef::new(AgreementSignatures::MemberId).uuid().not_null())
                    .col(
                        timestamp_with_time_zone(AgreementSignatures::SignedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_agreement_signatures_agreement_id")
                    .from(AgreementSignatures::Table, AgreementSignatures::AgreementId)
                    .to(Agreements::Table, Agreements::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        manager
            .create_foreign_key(
                ForeignKey::create()
                    .name("fk_agreement_signatures_member_id")
                    .from(AgreementSignatures::Table, AgreementSignatures::MemberId)
                    .to(TeamMembers::Table, TeamMembers::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                    .to_owned(),
            )
            .await?;

        // The authoritative duplicate-signature guard; the application's
        // pre-insert check is advisory only.
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agreement_signatures_agreement_member_unique")
                    .table(AgreementSignatures::Table)
                    .col(AgreementSignatures::AgreementId)
                    .col(AgreementSignatures::MemberId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_agreement_signatures_agreement_id")
                    .table(AgreementSignatures::Table)
                    .col(AgreementSignatures::AgreementId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AgreementSignatures::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum AgreementSignatures {
    Table,
    Id,
    AgreementId,
    MemberId,
    SignedAt,
}
