//! Endorsement entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Endorsement lifecycle states.
///
/// Declined endorsements are kept; together with the unique
/// (`trait_id`, `endorser_id`) key this blocks silent re-endorsement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EndorsementStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "declined")]
    Declined,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "endorsement")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// The endorsed trait
    pub trait_id: String,

    /// The user giving the endorsement (never the recipient)
    pub endorser_id: String,

    /// The trait owner
    pub recipient_id: String,

    /// Optional message shown in the recipient's inbox
    #[sea_orm(nullable)]
    pub message: Option<String>,

    /// Pending until the recipient approves or declines
    pub status: EndorsementStatus,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::traits::Entity",
        from = "Column::TraitId",
        to = "super::traits::Column::Id",
        on_delete = "Cascade"
    )]
    Trait,

    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::EndorserId",
        to = "super::profile::Column::UserId",
        on_delete = "Cascade"
    )]
    Endorser,

    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::RecipientId",
        to = "super::profile::Column::UserId",
        on_delete = "Cascade"
    )]
    Recipient,
}

impl Related<super::traits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Trait.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
