//! Database migrations.
//!
//! Schema migrations for the database.

#![allow(missing_docs)]

use sea_orm_migration::prelude::*;

mod m20260101_000001_create_profile_table;
mod m20260101_000002_create_trait_table;
mod m20260101_000003_create_endorsement_table;
mod m20260101_000004_create_notification_table;
mod m20260101_000005_create_bestie_relationship_table;
mod m20260101_000006_create_push_subscription_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_profile_table::Migration),
            Box::new(m20260101_000002_create_trait_table::Migration),
            Box::new(m20260101_000003_create_endorsement_table::Migration),
            Box::new(m20260101_000004_create_notification_table::Migration),
            Box::new(m20260101_000005_create_bestie_relationship_table::Migration),
            Box::new(m20260101_000006_create_push_subscription_table::Migration),
        ]
    }
}
