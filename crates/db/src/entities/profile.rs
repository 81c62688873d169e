//! Profile entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    /// Owning identity; profiles are 1:1 with users.
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,

    #[sea_orm(unique)]
    pub username: String,

    pub username_lower: String,

    /// Display name
    #[sea_orm(nullable)]
    pub display_name: Option<String>,

    /// Avatar URL
    #[sea_orm(nullable)]
    pub avatar_url: Option<String>,

    /// Profile bio
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,

    /// Social links (platform -> URL)
    #[sea_orm(column_type = "JsonBinary")]
    pub social_links: Json,

    /// Approved endorsements received across all traits (denormalized)
    #[sea_orm(default_value = 0)]
    pub endorsement_count: i32,

    /// Argon2 password hash (NULL for externally provisioned identities)
    #[sea_orm(nullable)]
    pub password: Option<String>,

    /// Access token
    #[sea_orm(unique, nullable)]
    pub token: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::traits::Entity")]
    Traits,

    #[sea_orm(has_many = "super::notification::Entity")]
    Notifications,
}

impl Related<super::traits::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Traits.def()
    }
}

impl Related<super::notification::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Notifications.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
