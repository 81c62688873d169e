//! Push subscription repository.

use std::sync::Arc;

use crate::entities::{PushSubscription, push_subscription};
use love8_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
};

/// Push subscription repository for database operations.
#[derive(Clone)]
pub struct PushSubscriptionRepository {
    db: Arc<DatabaseConnection>,
}

impl PushSubscriptionRepository {
    /// Create a new push subscription repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Create a new subscription.
    pub async fn create(
        &self,
        model: push_subscription::ActiveModel,
    ) -> AppResult<push_subscription::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// All subscriptions registered by a user.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<push_subscription::Model>> {
        PushSubscription::find()
            .filter(push_subscription::Column::UserId.eq(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a subscription by its endpoint URL.
    pub async fn find_by_endpoint(
        &self,
        endpoint: &str,
    ) -> AppResult<Option<push_subscription::Model>> {
        PushSubscription::find()
            .filter(push_subscription::Column::Endpoint.eq(endpoint))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a subscription (used when the push service reports it gone).
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let subscription = PushSubscription::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        if let Some(s) = subscription {
            s.delete(self.db.as_ref())
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_subscription(id: &str, user_id: &str) -> push_subscription::Model {
        push_subscription::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            endpoint: "https://push.example.com/sub/abc".to_string(),
            p256dh: "key".to_string(),
            auth: "secret".to_string(),
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_user() {
        let s1 = create_test_subscription("s1", "u1");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[s1]])
                .into_connection(),
        );

        let repo = PushSubscriptionRepository::new(db);
        let result = repo.find_by_user("u1").await.unwrap();

        assert_eq!(result.len(), 1);
    }

    #[tokio::test]
    async fn test_find_by_endpoint_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<push_subscription::Model>::new()])
                .into_connection(),
        );

        let repo = PushSubscriptionRepository::new(db);
        let result = repo
            .find_by_endpoint("https://push.example.com/sub/zzz")
            .await
            .unwrap();

        assert!(result.is_none());
    }
}
