//! Create profile table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Profile::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profile::UserId)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Profile::Username)
                            .string_len(128)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Profile::UsernameLower)
                            .string_len(128)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Profile::DisplayName).string_len(256))
                    .col(ColumnDef::new(Profile::AvatarUrl).string_len(512))
                    .col(ColumnDef::new(Profile::Bio).text())
                    .col(
                        ColumnDef::new(Profile::SocialLinks)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Profile::EndorsementCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Profile::Password).string_len(256))
                    .col(
                        ColumnDef::new(Profile::Token)
                            .string_len(64)
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Profile::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Profile::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Index: username_lower (case-insensitive lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_username_lower")
                    .table(Profile::Table)
                    .col(Profile::UsernameLower)
                    .to_owned(),
            )
            .await?;

        // Index: token (auth middleware lookup)
        manager
            .create_index(
                Index::create()
                    .name("idx_profile_token")
                    .table(Profile::Table)
                    .col(Profile::Token)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profile::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Profile {
    Table,
    UserId,
    Username,
    UsernameLower,
    DisplayName,
    AvatarUrl,
    Bio,
    SocialLinks,
    EndorsementCount,
    Password,
    Token,
    CreatedAt,
    UpdatedAt,
}
