//! Create bestie relationship table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BestieRelationship::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BestieRelationship::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(BestieRelationship::RequesterId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BestieRelationship::RecipientId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(BestieRelationship::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(BestieRelationship::StreakCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BestieRelationship::LastActivityAt)
                            .timestamp_with_time_zone(),
                    )
                    .col(
                        ColumnDef::new(BestieRelationship::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(BestieRelationship::UpdatedAt)
                            .timestamp_with_time_zone(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bestie_requester")
                            .from(BestieRelationship::Table, BestieRelationship::RequesterId)
                            .to(Profile::Table, Profile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_bestie_recipient")
                            .from(BestieRelationship::Table, BestieRelationship::RecipientId)
                            .to(Profile::Table, Profile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Indexes on both sides (the relationship is symmetric)
        manager
            .create_index(
                Index::create()
                    .name("idx_bestie_requester_id")
                    .table(BestieRelationship::Table)
                    .col(BestieRelationship::RequesterId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bestie_recipient_id")
                    .table(BestieRelationship::Table)
                    .col(BestieRelationship::RecipientId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BestieRelationship::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum BestieRelationship {
    Table,
    Id,
    RequesterId,
    RecipientId,
    Status,
    StreakCount,
    LastActivityAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Profile {
    Table,
    UserId,
}
