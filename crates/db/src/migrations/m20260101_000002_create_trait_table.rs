//! Create trait table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Trait::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Trait::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Trait::UserId).string_len(32).not_null())
                    .col(ColumnDef::new(Trait::Word).string_len(20).not_null())
                    .col(ColumnDef::new(Trait::Description).string_len(100))
                    .col(ColumnDef::new(Trait::ColorTheme).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Trait::EndorsementCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Trait::IsApproved)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Trait::AiSuggested)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Trait::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Trait::UpdatedAt).timestamp_with_time_zone())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_trait_profile")
                            .from(Trait::Table, Trait::UserId)
                            .to(Profile::Table, Profile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index: user_id (own-trait listing)
        manager
            .create_index(
                Index::create()
                    .name("idx_trait_user_id")
                    .table(Trait::Table)
                    .col(Trait::UserId)
                    .to_owned(),
            )
            .await?;

        // Index: (is_approved, created_at) (public feed query)
        manager
            .create_index(
                Index::create()
                    .name("idx_trait_approved_created_at")
                    .table(Trait::Table)
                    .col(Trait::IsApproved)
                    .col(Trait::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Trait::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Trait {
    Table,
    Id,
    UserId,
    Word,
    Description,
    ColorTheme,
    EndorsementCount,
    IsApproved,
    AiSuggested,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profile {
    Table,
    UserId,
}
