use sea_orm_migration::{prelude::*, schema::*, sea_query::extension::postgres::Type};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create member_role enum type
        manager
            .create_type(
                Type::create()
                    .as_enum(MemberRole::Table)
                    .values(vec![MemberRole::Lead, MemberRole::Member])
                    .to_owned(),
            )
            .await?;

        // Create team_members table using schema helpers
        manager
            .create_table(
                Table::create()
                    .table(TeamMembers::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TeamMembers::Id)
                            .uuid()
                            .not_null()
                            .primary_key()
                            .default(Expr::cust("gen_random_uuid()")),
                    )
                    .col(string(TeamMembers::Name).not_null())
                    .col(string(TeamMembers::Email).not_null().unique_key())
                    .col(text_null(TeamMembers::AvatarUrl))
                    .col(
                        enumeration(
                            TeamMembers::Role,
                            MemberRole::Table,
                            vec![MemberRole::Lead, MemberRole::Member],
                        )
                        .default("member"),
                    )
                    .col(
                        timestamp_with_time_zone(TeamMembers::CreatedAt)
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TeamMembers::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(MemberRole::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
pub enum TeamMembers {
    Table,
    Id,
    Name,
    Email,
    AvatarUrl,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum MemberRole {
    #[sea_orm(iden = "member_role")]
    Table,
    Lead,
    Member,
}
