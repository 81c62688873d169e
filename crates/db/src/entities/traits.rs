//! Trait entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Color themes for trait bubbles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ColorTheme {
    #[sea_orm(string_value = "blue")]
    Blue,
    #[sea_orm(string_value = "purple")]
    Purple,
    #[sea_orm(string_value = "pink")]
    Pink,
    #[sea_orm(string_value = "green")]
    Green,
    #[sea_orm(string_value = "orange")]
    Orange,
    #[sea_orm(string_value = "red")]
    Red,
}

/// Display style for a color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorStyle {
    pub background: &'static str,
    pub border: &'static str,
    pub text: &'static str,
    pub glow: &'static str,
}

impl ColorTheme {
    /// The full fixed palette.
    pub const ALL: [Self; 6] = [
        Self::Blue,
        Self::Purple,
        Self::Pink,
        Self::Green,
        Self::Orange,
        Self::Red,
    ];

    /// Static lookup of the display style triple for this theme.
    #[must_use]
    pub const fn style(self) -> ColorStyle {
        match self {
            Self::Blue => ColorStyle {
                background: "bg-blue-500/20",
                border: "border-blue-500/30",
                text: "text-blue-300",
                glow: "shadow-blue-500/50",
            },
            Self::Purple => ColorStyle {
                background: "bg-purple-500/20",
                border: "border-purple-500/30",
                text: "text-purple-300",
                glow: "shadow-purple-500/50",
            },
            Self::Pink => ColorStyle {
                background: "bg-pink-500/20",
                border: "border-pink-500/30",
                text: "text-pink-300",
                glow: "shadow-pink-500/50",
            },
            Self::Green => ColorStyle {
                background: "bg-green-500/20",
                border: "border-green-500/30",
                text: "text-green-300",
                glow: "shadow-green-500/50",
            },
            Self::Orange => ColorStyle {
                background: "bg-orange-500/20",
                border: "border-orange-500/30",
                text: "text-orange-300",
                glow: "shadow-orange-500/50",
            },
            Self::Red => ColorStyle {
                background: "bg-red-500/20",
                border: "border-red-500/30",
                text: "text-red-300",
                glow: "shadow-red-500/50",
            },
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "trait")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Owning profile
    pub user_id: String,

    /// The trait word (2-20 chars, alphabetic + spaces)
    pub word: String,

    /// Optional short description
    #[sea_orm(nullable)]
    pub description: Option<String>,

    /// Bubble color theme
    pub color_theme: ColorTheme,

    /// Approved endorsements on this trait (denormalized, monotonic)
    #[sea_orm(default_value = 0)]
    pub endorsement_count: i32,

    /// Visible in the public feed once approved
    #[sea_orm(default_value = false)]
    pub is_approved: bool,

    /// Was this trait suggested by the AI?
    #[sea_orm(default_value = false)]
    pub ai_suggested: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::profile::Entity",
        from = "Column::UserId",
        to = "super::profile::Column::UserId",
        on_delete = "Cascade"
    )]
    Profile,

    #[sea_orm(has_many = "super::endorsement::Entity")]
    Endorsements,
}

impl Related<super::profile::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Profile.def()
    }
}

impl Related<super::endorsement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Endorsements.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_has_six_themes() {
        assert_eq!(ColorTheme::ALL.len(), 6);
    }

    #[test]
    fn test_every_theme_has_a_style() {
        for theme in ColorTheme::ALL {
            let style = theme.style();
            assert!(style.background.starts_with("bg-"));
            assert!(style.border.starts_with("border-"));
            assert!(style.text.starts_with("text-"));
            assert!(style.glow.starts_with("shadow-"));
        }
    }
}
