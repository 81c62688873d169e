//! Bestie relationship service.

use crate::services::event_publisher::EventPublisherService;
use chrono::{DateTime, Duration, Utc};
use love8_common::{AppError, AppResult, IdGenerator};
use love8_db::{
    entities::bestie_relationship::{self, BestieStatus},
    repositories::{BestieRelationshipRepository, TraitRepository},
};
use sea_orm::Set;
use std::collections::HashSet;

/// How two activity timestamps relate for streak purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakEvent {
    /// Same calendar day; the streak is unchanged.
    SameDay,
    /// Consecutive calendar days; the streak grows.
    Continue,
    /// A gap; the streak resets.
    Break,
}

/// Bestie service for business logic.
#[derive(Clone)]
pub struct BestieService {
    bestie_repo: BestieRelationshipRepository,
    trait_repo: TraitRepository,
    event_publisher: Option<EventPublisherService>,
    id_gen: IdGenerator,
}

impl BestieService {
    /// Create a new bestie service.
    #[must_use]
    pub const fn new(
        bestie_repo: BestieRelationshipRepository,
        trait_repo: TraitRepository,
    ) -> Self {
        Self {
            bestie_repo,
            trait_repo,
            event_publisher: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    /// Classify consecutive activity timestamps by calendar day.
    #[must_use]
    pub fn classify_streak(last: DateTime<Utc>, current: DateTime<Utc>) -> StreakEvent {
        let last_day = last.date_naive();
        let current_day = current.date_naive();
        let yesterday = (current - Duration::days(1)).date_naive();

        if last_day == current_day {
            StreakEvent::SameDay
        } else if last_day == yesterday {
            StreakEvent::Continue
        } else {
            StreakEvent::Break
        }
    }

    /// Send a bestie request to another user.
    pub async fn request(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> AppResult<bestie_relationship::Model> {
        if requester_id == recipient_id {
            return Err(AppError::BadRequest(
                "You cannot bestie yourself".to_string(),
            ));
        }

        // The relationship is symmetric: a pair in either direction blocks
        // a second request.
        if self
            .bestie_repo
            .find_pair(requester_id, recipient_id)
            .await?
            .is_some()
        {
            return Err(AppError::Conflict(
                "A bestie relationship already exists".to_string(),
            ));
        }

        let model = bestie_relationship::ActiveModel {
            id: Set(self.id_gen.generate()),
            requester_id: Set(requester_id.to_string()),
            recipient_id: Set(recipient_id.to_string()),
            status: Set(BestieStatus::Pending),
            streak_count: Set(0),
            last_activity_at: Set(None),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        let created = self.bestie_repo.create(model).await?;

        if let Some(ref event_publisher) = self.event_publisher {
            if let Err(e) = event_publisher
                .publish_bestie_requested(requester_id, recipient_id)
                .await
            {
                tracing::warn!(error = %e, "Failed to publish bestie requested event");
            }
        }

        Ok(created)
    }

    /// Accept a pending bestie request addressed to you.
    pub async fn accept(&self, recipient_id: &str, relationship_id: &str) -> AppResult<()> {
        let relationship = self.bestie_repo.get_by_id(relationship_id).await?;

        if relationship.recipient_id != recipient_id {
            return Err(AppError::Forbidden(
                "You can only accept requests addressed to you".to_string(),
            ));
        }

        let transitioned = self.bestie_repo.accept_pending(relationship_id).await?;
        if !transitioned {
            tracing::debug!(relationship_id = %relationship_id, "Request already resolved");
            return Ok(());
        }

        if let Some(ref event_publisher) = self.event_publisher {
            if let Err(e) = event_publisher
                .publish_bestie_accepted(&relationship.requester_id, recipient_id)
                .await
            {
                tracing::warn!(error = %e, "Failed to publish bestie accepted event");
            }
        }

        Ok(())
    }

    /// Get the accepted relationship a user belongs to, if any.
    pub async fn bestie_of(
        &self,
        user_id: &str,
    ) -> AppResult<Option<bestie_relationship::Model>> {
        self.bestie_repo.find_accepted_for_user(user_id).await
    }

    /// Pending requests addressed to a user.
    pub async fn pending_requests(
        &self,
        user_id: &str,
    ) -> AppResult<Vec<bestie_relationship::Model>> {
        self.bestie_repo.find_pending_for_recipient(user_id).await
    }

    /// Record activity on a user's accepted relationship, advancing the
    /// day streak. Returns the updated relationship, or `None` when the
    /// user has no accepted bestie.
    pub async fn record_activity(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<bestie_relationship::Model>> {
        let Some(relationship) = self.bestie_repo.find_accepted_for_user(user_id).await? else {
            return Ok(None);
        };

        let streak = match relationship.last_activity_at {
            None => 1,
            Some(last) => match Self::classify_streak(last.to_utc(), now) {
                StreakEvent::SameDay => relationship.streak_count,
                StreakEvent::Continue => relationship.streak_count + 1,
                StreakEvent::Break => 1,
            },
        };

        let mut active: bestie_relationship::ActiveModel = relationship.into();
        active.streak_count = Set(streak);
        active.last_activity_at = Set(Some(now.into()));
        active.updated_at = Set(Some(now.into()));

        self.bestie_repo.update(active).await.map(Some)
    }

    /// The trait words both users share (lowercase-normalized).
    pub async fn mutual_traits(&self, a: &str, b: &str) -> AppResult<Vec<String>> {
        let traits_a = self.trait_repo.find_approved_by_user(a).await?;
        let traits_b = self.trait_repo.find_approved_by_user(b).await?;

        let words_b: HashSet<String> = traits_b
            .into_iter()
            .map(|t| t.word.to_lowercase())
            .collect();

        let mut mutual: Vec<String> = traits_a
            .into_iter()
            .map(|t| t.word.to_lowercase())
            .filter(|w| words_b.contains(w))
            .collect();
        mutual.dedup();

        Ok(mutual)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use love8_db::entities::traits::{self, ColorTheme};
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_classify_streak_same_day() {
        let last = at(2026, 3, 14, 9);
        let current = at(2026, 3, 14, 22);
        assert_eq!(
            BestieService::classify_streak(last, current),
            StreakEvent::SameDay
        );
    }

    #[test]
    fn test_classify_streak_continue() {
        let last = at(2026, 3, 13, 23);
        let current = at(2026, 3, 14, 1);
        assert_eq!(
            BestieService::classify_streak(last, current),
            StreakEvent::Continue
        );
    }

    #[test]
    fn test_classify_streak_break() {
        let last = at(2026, 3, 10, 12);
        let current = at(2026, 3, 14, 12);
        assert_eq!(
            BestieService::classify_streak(last, current),
            StreakEvent::Break
        );
    }

    fn create_test_trait(id: &str, user_id: &str, word: &str) -> traits::Model {
        traits::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            word: word.to_string(),
            description: None,
            color_theme: ColorTheme::Blue,
            endorsement_count: 0,
            is_approved: true,
            ai_suggested: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_request_self_rejected() {
        let bestie_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let trait_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = BestieService::new(
            BestieRelationshipRepository::new(bestie_db),
            TraitRepository::new(trait_db),
        );

        let result = service.request("u1", "u1").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_mutual_traits_lowercase_intersection() {
        let a = vec![
            create_test_trait("t1", "u1", "Creative"),
            create_test_trait("t2", "u1", "Kind"),
        ];
        let b = vec![
            create_test_trait("t3", "u2", "creative"),
            create_test_trait("t4", "u2", "Loyal"),
        ];

        let trait_db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([a, b])
                .into_connection(),
        );
        let bestie_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let service = BestieService::new(
            BestieRelationshipRepository::new(bestie_db),
            TraitRepository::new(trait_db),
        );

        let mutual = service.mutual_traits("u1", "u2").await.unwrap();
        assert_eq!(mutual, vec!["creative".to_string()]);
    }
}
