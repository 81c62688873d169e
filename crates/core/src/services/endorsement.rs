//! Endorsement service.

use crate::services::event_publisher::EventPublisherService;
use crate::services::notification::NotificationService;
use love8_common::{AppError, AppResult, IdGenerator};
use love8_db::{
    entities::{
        endorsement::{self, EndorsementStatus},
        traits,
    },
    repositories::{EndorsementRepository, ProfileRepository, TraitRepository},
};
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Input for creating an endorsement.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateEndorsementInput {
    pub trait_id: String,

    #[validate(length(max = 500))]
    pub message: Option<String>,
}

/// A pending inbox entry: the endorsement plus the endorsed trait.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingEndorsement {
    #[serde(flatten)]
    pub inner: endorsement::Model,
    pub trait_word: Option<String>,
}

/// Endorsement service for business logic.
#[derive(Clone)]
pub struct EndorsementService {
    endorsement_repo: EndorsementRepository,
    trait_repo: TraitRepository,
    profile_repo: ProfileRepository,
    notifications: Option<NotificationService>,
    event_publisher: Option<EventPublisherService>,
    id_gen: IdGenerator,
}

impl EndorsementService {
    /// Create a new endorsement service.
    #[must_use]
    pub const fn new(
        endorsement_repo: EndorsementRepository,
        trait_repo: TraitRepository,
        profile_repo: ProfileRepository,
    ) -> Self {
        Self {
            endorsement_repo,
            trait_repo,
            profile_repo,
            notifications: None,
            event_publisher: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the notification service.
    pub fn set_notifications(&mut self, notifications: NotificationService) {
        self.notifications = Some(notifications);
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    /// Endorse another user's trait.
    ///
    /// The endorsement lands pending in the trait owner's inbox; nothing
    /// is counted until the owner approves it.
    pub async fn endorse(
        &self,
        endorser_id: &str,
        input: CreateEndorsementInput,
    ) -> AppResult<endorsement::Model> {
        input.validate()?;

        let endorsed_trait = self.trait_repo.get_by_id(&input.trait_id).await?;

        if endorsed_trait.user_id == endorser_id {
            return Err(AppError::BadRequest(
                "You cannot endorse your own trait".to_string(),
            ));
        }

        // Server-side duplicate guard; the unique (trait_id, endorser_id)
        // key backs this up against concurrent submissions.
        if self
            .endorsement_repo
            .exists_for_pair(&input.trait_id, endorser_id)
            .await?
        {
            return Err(AppError::Conflict(
                "You already endorsed this trait".to_string(),
            ));
        }

        let message = input
            .message
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(str::to_string);

        let model = endorsement::ActiveModel {
            id: Set(self.id_gen.generate()),
            trait_id: Set(endorsed_trait.id.clone()),
            endorser_id: Set(endorser_id.to_string()),
            recipient_id: Set(endorsed_trait.user_id.clone()),
            message: Set(message),
            status: Set(EndorsementStatus::Pending),
            created_at: Set(chrono::Utc::now().into()),
        };

        let created = self.endorsement_repo.create(model).await?;

        self.notify_received(endorser_id, &endorsed_trait, &created)
            .await;

        // Publish real-time event
        if let Some(ref event_publisher) = self.event_publisher {
            if let Err(e) = event_publisher
                .publish_endorsement_received(
                    &endorsed_trait.user_id,
                    &created.id,
                    &endorsed_trait.id,
                )
                .await
            {
                tracing::warn!(error = %e, "Failed to publish endorsement received event");
            }
        }

        Ok(created)
    }

    /// Approve a pending endorsement.
    ///
    /// The pending-to-approved transition is conditional, so a repeated
    /// approval is a no-op and never double-counts: the counters are
    /// incremented only when this call performed the transition.
    pub async fn approve(&self, recipient_id: &str, endorsement_id: &str) -> AppResult<()> {
        let endorsement = self.endorsement_repo.get_by_id(endorsement_id).await?;

        if endorsement.recipient_id != recipient_id {
            return Err(AppError::Forbidden(
                "You can only approve endorsements on your own traits".to_string(),
            ));
        }

        let transitioned = self.endorsement_repo.approve_pending(endorsement_id).await?;
        if !transitioned {
            tracing::debug!(endorsement_id = %endorsement_id, "Endorsement already resolved");
            return Ok(());
        }

        self.trait_repo
            .increment_endorsement_count(&endorsement.trait_id)
            .await?;
        self.profile_repo
            .increment_endorsement_count(recipient_id)
            .await?;

        self.notify_approved(&endorsement).await;

        // Publish real-time events (the trait row changed too)
        if let Some(ref event_publisher) = self.event_publisher {
            if let Err(e) = event_publisher
                .publish_endorsement_approved(
                    recipient_id,
                    endorsement_id,
                    &endorsement.trait_id,
                )
                .await
            {
                tracing::warn!(error = %e, "Failed to publish endorsement approved event");
            }

            if let Ok(updated_trait) = self.trait_repo.get_by_id(&endorsement.trait_id).await {
                if let Err(e) = event_publisher.publish_trait_updated(&updated_trait).await {
                    tracing::warn!(error = %e, "Failed to publish trait updated event");
                }
            }
        }

        Ok(())
    }

    /// Decline a pending endorsement.
    ///
    /// The row is kept with a declined status; the same endorser cannot
    /// re-endorse the trait afterwards.
    pub async fn decline(&self, recipient_id: &str, endorsement_id: &str) -> AppResult<()> {
        let endorsement = self.endorsement_repo.get_by_id(endorsement_id).await?;

        if endorsement.recipient_id != recipient_id {
            return Err(AppError::Forbidden(
                "You can only decline endorsements on your own traits".to_string(),
            ));
        }

        let transitioned = self.endorsement_repo.decline_pending(endorsement_id).await?;
        if !transitioned {
            tracing::debug!(endorsement_id = %endorsement_id, "Endorsement already resolved");
        }

        Ok(())
    }

    /// Get a recipient's pending endorsement inbox.
    pub async fn pending_inbox(&self, recipient_id: &str) -> AppResult<Vec<PendingEndorsement>> {
        let rows = self
            .endorsement_repo
            .find_pending_by_recipient(recipient_id)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(inner, endorsed_trait)| PendingEndorsement {
                inner,
                trait_word: endorsed_trait.map(|t| t.word),
            })
            .collect())
    }

    /// Notify the trait owner of a fresh endorsement. Best-effort.
    async fn notify_received(
        &self,
        endorser_id: &str,
        endorsed_trait: &traits::Model,
        endorsement: &endorsement::Model,
    ) {
        let Some(ref notifications) = self.notifications else {
            return;
        };

        let endorser_name = match self.profile_repo.find_by_user_id(endorser_id).await {
            Ok(Some(p)) => p.display_name.unwrap_or(p.username),
            _ => "Someone".to_string(),
        };

        let title = format!(
            "{} endorsed your trait \"{}\"",
            endorser_name, endorsed_trait.word
        );
        if let Err(e) = notifications
            .notify(
                &endorsed_trait.user_id,
                &title,
                endorsement.message.as_deref(),
            )
            .await
        {
            tracing::warn!(error = %e, "Failed to create endorsement notification");
        }
    }

    /// Notify the endorser that their endorsement was approved. Best-effort.
    async fn notify_approved(&self, endorsement: &endorsement::Model) {
        let Some(ref notifications) = self.notifications else {
            return;
        };

        let word = match self.trait_repo.find_by_id(&endorsement.trait_id).await {
            Ok(Some(t)) => t.word,
            _ => "a trait".to_string(),
        };

        let title = format!("Your endorsement of \"{word}\" was approved");
        if let Err(e) = notifications
            .notify(&endorsement.endorser_id, &title, None)
            .await
        {
            tracing::warn!(error = %e, "Failed to create approval notification");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use love8_db::entities::traits::ColorTheme;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn create_test_trait(id: &str, user_id: &str) -> traits::Model {
        traits::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            word: "Creative".to_string(),
            description: None,
            color_theme: ColorTheme::Purple,
            endorsement_count: 0,
            is_approved: true,
            ai_suggested: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    fn create_test_endorsement(
        id: &str,
        endorser_id: &str,
        recipient_id: &str,
        status: EndorsementStatus,
    ) -> endorsement::Model {
        endorsement::Model {
            id: id.to_string(),
            trait_id: "t1".to_string(),
            endorser_id: endorser_id.to_string(),
            recipient_id: recipient_id.to_string(),
            message: None,
            status,
            created_at: Utc::now().into(),
        }
    }

    fn service_with(
        endorsement_db: MockDatabase,
        trait_db: MockDatabase,
    ) -> EndorsementService {
        let profile_db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        EndorsementService::new(
            EndorsementRepository::new(Arc::new(endorsement_db.into_connection())),
            TraitRepository::new(Arc::new(trait_db.into_connection())),
            ProfileRepository::new(profile_db),
        )
    }

    #[tokio::test]
    async fn test_endorse_unknown_trait() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<traits::Model>::new()]),
        );

        let result = service
            .endorse(
                "u2",
                CreateEndorsementInput {
                    trait_id: "nonexistent".to_string(),
                    message: None,
                },
            )
            .await;

        match result {
            Err(AppError::TraitNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected TraitNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_endorse_own_trait_rejected() {
        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_trait("t1", "u1")]]),
        );

        let result = service
            .endorse(
                "u1",
                CreateEndorsementInput {
                    trait_id: "t1".to_string(),
                    message: None,
                },
            )
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("your own trait")),
            _ => panic!("Expected BadRequest error"),
        }
    }

    #[tokio::test]
    async fn test_endorse_duplicate_pair_conflicts() {
        let existing = create_test_endorsement("e1", "u2", "u1", EndorsementStatus::Pending);

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[existing]]),
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[create_test_trait("t1", "u1")]]),
        );

        let result = service
            .endorse(
                "u2",
                CreateEndorsementInput {
                    trait_id: "t1".to_string(),
                    message: None,
                },
            )
            .await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_approve_requires_ownership() {
        let endorsement = create_test_endorsement("e1", "u2", "u1", EndorsementStatus::Pending);

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[endorsement]]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.approve("u3", "e1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_approve_already_approved_is_noop() {
        // The conditional transition affects zero rows: no counters touched.
        let endorsement = create_test_endorsement("e1", "u2", "u1", EndorsementStatus::Approved);

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[endorsement]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.approve("u1", "e1").await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_decline_requires_ownership() {
        let endorsement = create_test_endorsement("e1", "u2", "u1", EndorsementStatus::Pending);

        let service = service_with(
            MockDatabase::new(DatabaseBackend::Postgres).append_query_results([[endorsement]]),
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        let result = service.decline("u3", "e1").await;

        assert!(matches!(result, Err(AppError::Forbidden(_))));
    }
}
