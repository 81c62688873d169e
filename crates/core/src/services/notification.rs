//! Notification service.

use crate::services::event_publisher::EventPublisherService;
use crate::services::push::PushService;
use love8_common::{AppResult, IdGenerator};
use love8_db::{entities::notification, repositories::NotificationRepository};
use sea_orm::Set;

/// Notifications are capped per listing request.
const LIST_LIMIT: u64 = 50;

/// Notification service for business logic.
#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    event_publisher: Option<EventPublisherService>,
    push: Option<PushService>,
    id_gen: IdGenerator,
}

impl NotificationService {
    /// Create a new notification service.
    #[must_use]
    pub const fn new(notification_repo: NotificationRepository) -> Self {
        Self {
            notification_repo,
            event_publisher: None,
            push: None,
            id_gen: IdGenerator::new(),
        }
    }

    /// Set the event publisher.
    pub fn set_event_publisher(&mut self, event_publisher: EventPublisherService) {
        self.event_publisher = Some(event_publisher);
    }

    /// Set the push service.
    pub fn set_push(&mut self, push: PushService) {
        self.push = Some(push);
    }

    /// Create a notification for a user.
    ///
    /// Real-time and push delivery are both best-effort; failures are
    /// logged and the stored notification is still returned.
    pub async fn notify(
        &self,
        user_id: &str,
        title: &str,
        body: Option<&str>,
    ) -> AppResult<notification::Model> {
        let model = notification::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            title: Set(title.to_string()),
            body: Set(body.map(str::to_string)),
            is_read: Set(false),
            created_at: Set(chrono::Utc::now().into()),
        };

        let notification = self.notification_repo.create(model).await?;

        // Publish real-time event
        if let Some(ref event_publisher) = self.event_publisher {
            if let Err(e) = event_publisher.publish_notification(&notification).await {
                tracing::warn!(error = %e, "Failed to publish notification event");
            }
        }

        // Fan out to push subscriptions
        if let Some(ref push) = self.push {
            push.send_to_user(user_id, title, body).await;
        }

        Ok(notification)
    }

    /// Get notifications for a user, newest first.
    pub async fn list(&self, user_id: &str) -> AppResult<Vec<notification::Model>> {
        self.notification_repo.find_by_user(user_id, LIST_LIMIT).await
    }

    /// Mark a notification as read.
    pub async fn mark_as_read(&self, user_id: &str, notification_id: &str) -> AppResult<()> {
        // Verify the notification belongs to the user
        let notification = self.notification_repo.find_by_id(notification_id).await?;
        if let Some(n) = notification
            && n.user_id == user_id
        {
            self.notification_repo.mark_as_read(notification_id).await?;
        }
        Ok(())
    }

    /// Mark all notifications as read for a user.
    pub async fn mark_all_as_read(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.mark_all_as_read(user_id).await
    }

    /// Count unread notifications for a user.
    pub async fn count_unread(&self, user_id: &str) -> AppResult<u64> {
        self.notification_repo.count_unread(user_id).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_notification(id: &str, user_id: &str) -> notification::Model {
        notification::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            title: "Someone endorsed your trait".to_string(),
            body: None,
            is_read: false,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_notify_creates_notification() {
        let created = create_test_notification("n1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[created]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let notification = service
            .notify("u1", "Someone endorsed your trait", None)
            .await
            .unwrap();

        assert_eq!(notification.user_id, "u1");
        assert!(!notification.is_read);
    }

    #[tokio::test]
    async fn test_mark_as_read_ignores_foreign_notification() {
        // Notification belongs to u1; u2 cannot flip it. The mock has no
        // exec result queued, so an update attempt would fail the test.
        let other = create_test_notification("n1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[other]])
                .into_connection(),
        );

        let service = NotificationService::new(NotificationRepository::new(db));
        let result = service.mark_as_read("u2", "n1").await;

        assert!(result.is_ok());
    }
}
