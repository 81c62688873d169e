//! Trait service.

use crate::services::event_publisher::EventPublisherService;
use love8_common::{AppError, AppResult, IdGenerator};
use love8_db::{
    entities::{
        profile,
        traits::{self, ColorTheme},
    },
    repositories::TraitRepository,
};
use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use regex::Regex;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[allow(clippy::expect_used)]
static TRAIT_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z\s]+$").expect("valid trait word pattern"));

/// A feed trait joined with minimal author fields.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraitWithAuthor {
    #[serde(flatten)]
    pub inner: traits::Model,
    pub username: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<(traits::Model, Option<profile::Model>)> for TraitWithAuthor {
    fn from((inner, author): (traits::Model, Option<profile::Model>)) -> Self {
        let (username, display_name, avatar_url) = author
            .map(|p| (Some(p.username), p.display_name, p.avatar_url))
            .unwrap_or_default();
        Self {
            inner,
            username,
            display_name,
            avatar_url,
        }
    }
}

/// Input for creating a trait.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTraitInput {
    pub word: String,

    #[validate(length(max = 100))]
    pub description: Option<String>,

    /// Set when the word came from an AI suggestion.
    #[serde(default)]
    pub ai_suggested: bool,
}

/// Trait service for business logic.
#[derive(Clone)]
pub struct TraitService {
    trait_repo: TraitRepository,
    event_publisher: Option<EventPublisherService>,
    id_gen: IdGenerator,
}

impl TraitService {
    /// Create a new trait service.
    #[must_use]
    pub const fn new(trait_repo: TraitRepository) -> Self {
        Self {
            trait_repo,
            event_publisher: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    /// Validate a trait word: 2-20 characters, alphabetic and spaces only.
    #[must_use]
    pub fn validate_word(word: &str) -> bool {
        if word.len() < 2 || word.len() > 20 {
            return false;
        }
        TRAIT_WORD_RE.is_match(word)
    }

    /// Pick a uniformly random color theme from the fixed palette.
    #[must_use]
    pub fn random_color() -> ColorTheme {
        *ColorTheme::ALL
            .choose(&mut rand::thread_rng())
            .unwrap_or(&ColorTheme::Blue)
    }

    /// Add a trait to a user's own profile.
    ///
    /// The word is trimmed, validated and stored as typed; self-added
    /// traits are approved immediately.
    pub async fn add(&self, user_id: &str, input: CreateTraitInput) -> AppResult<traits::Model> {
        input.validate()?;

        let word = input.word.trim();
        if !Self::validate_word(word) {
            return Err(AppError::Validation(
                "Trait word must be 2-20 alphabetic characters".to_string(),
            ));
        }

        let description = input
            .description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let model = traits::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            word: Set(word.to_string()),
            description: Set(description),
            color_theme: Set(Self::random_color()),
            endorsement_count: Set(0),
            is_approved: Set(true),
            ai_suggested: Set(input.ai_suggested),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.trait_repo.create(model).await?;

        // Publish real-time event
        if let Some(ref event_publisher) = self.event_publisher {
            if let Err(e) = event_publisher.publish_trait_created(&created).await {
                tracing::warn!(error = %e, "Failed to publish trait created event");
            }
        }

        Ok(created)
    }

    /// Get a trait by ID.
    pub async fn get(&self, id: &str) -> AppResult<traits::Model> {
        self.trait_repo.get_by_id(id).await
    }

    /// Get a user's own approved traits, most endorsed first.
    pub async fn list_own(&self, user_id: &str) -> AppResult<Vec<traits::Model>> {
        self.trait_repo.find_approved_by_user(user_id).await
    }

    /// Get the public feed: all approved traits with minimal author
    /// fields, newest first.
    pub async fn feed(&self, limit: u64) -> AppResult<Vec<TraitWithAuthor>> {
        let rows = self.trait_repo.find_all_approved(limit).await?;
        Ok(rows.into_iter().map(TraitWithAuthor::from).collect())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    // Unit tests for validate_word
    #[test]
    fn test_validate_word_accepts_simple_word() {
        assert!(TraitService::validate_word("Creative"));
    }

    #[test]
    fn test_validate_word_accepts_spaces() {
        assert!(TraitService::validate_word("Deep Thinker"));
    }

    #[test]
    fn test_validate_word_rejects_empty() {
        assert!(!TraitService::validate_word(""));
    }

    #[test]
    fn test_validate_word_rejects_single_character() {
        assert!(!TraitService::validate_word("A"));
    }

    #[test]
    fn test_validate_word_rejects_too_long() {
        assert!(!TraitService::validate_word("Supercalifragilistico"));
    }

    #[test]
    fn test_validate_word_rejects_digits() {
        assert!(!TraitService::validate_word("Cool123"));
    }

    #[test]
    fn test_validate_word_rejects_punctuation() {
        assert!(!TraitService::validate_word("Witty!"));
    }

    #[test]
    fn test_validate_word_boundaries() {
        assert!(TraitService::validate_word("Ab"));
        assert!(TraitService::validate_word("Abcdefghijklmnopqrst")); // 20 chars
    }

    #[test]
    fn test_random_color_is_in_palette() {
        for _ in 0..32 {
            let color = TraitService::random_color();
            assert!(ColorTheme::ALL.contains(&color));
        }
    }

    // Service tests
    #[tokio::test]
    async fn test_add_rejects_invalid_word() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = TraitService::new(TraitRepository::new(db));

        let result = service
            .add(
                "u1",
                CreateTraitInput {
                    word: "Cool123".to_string(),
                    description: None,
                    ai_suggested: false,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_rejects_overlong_description() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let service = TraitService::new(TraitRepository::new(db));

        let result = service
            .add(
                "u1",
                CreateTraitInput {
                    word: "Creative".to_string(),
                    description: Some("x".repeat(101)),
                    ai_suggested: false,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_add_trims_word_before_validation() {
        // "  Kind  " trims to a valid word; the mock returns the inserted row.
        let inserted = traits::Model {
            id: "t1".to_string(),
            user_id: "u1".to_string(),
            word: "Kind".to_string(),
            description: None,
            color_theme: ColorTheme::Green,
            endorsement_count: 0,
            is_approved: true,
            ai_suggested: false,
            created_at: chrono::Utc::now().into(),
            updated_at: None,
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[inserted]])
                .into_connection(),
        );
        let service = TraitService::new(TraitRepository::new(db));

        let created = service
            .add(
                "u1",
                CreateTraitInput {
                    word: "  Kind  ".to_string(),
                    description: None,
                    ai_suggested: false,
                },
            )
            .await
            .unwrap();

        assert_eq!(created.word, "Kind");
        assert!(created.is_approved);
    }
}
