//! Create endorsement table migration.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Endorsement::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Endorsement::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Endorsement::TraitId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Endorsement::EndorserId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Endorsement::RecipientId)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Endorsement::Message).string_len(500))
                    .col(
                        ColumnDef::new(Endorsement::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Endorsement::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_endorsement_trait")
                            .from(Endorsement::Table, Endorsement::TraitId)
                            .to(Trait::Table, Trait::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_endorsement_endorser")
                            .from(Endorsement::Table, Endorsement::EndorserId)
                            .to(Profile::Table, Profile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_endorsement_recipient")
                            .from(Endorsement::Table, Endorsement::RecipientId)
                            .to(Profile::Table, Profile::UserId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique: one endorsement per (trait, endorser) pair. Closes the
        // cross-client double-endorsement race.
        manager
            .create_index(
                Index::create()
                    .name("idx_endorsement_trait_endorser")
                    .table(Endorsement::Table)
                    .col(Endorsement::TraitId)
                    .col(Endorsement::EndorserId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (recipient_id, status) (pending inbox)
        manager
            .create_index(
                Index::create()
                    .name("idx_endorsement_recipient_status")
                    .table(Endorsement::Table)
                    .col(Endorsement::RecipientId)
                    .col(Endorsement::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Endorsement::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Endorsement {
    Table,
    Id,
    TraitId,
    EndorserId,
    RecipientId,
    Message,
    Status,
    CreatedAt,
}

#[derive(Iden)]
enum Trait {
    Table,
    Id,
}

#[derive(Iden)]
enum Profile {
    Table,
    UserId,
}
