//! Push notification service.
//!
//! Entirely best-effort: delivery failures are logged, never surfaced,
//! and an unkeyed configuration turns the whole service into a no-op.

use love8_common::{AppResult, IdGenerator, config::PushConfig};
use love8_db::{entities::push_subscription, repositories::PushSubscriptionRepository};
use sea_orm::Set;
use serde::Deserialize;
use serde_json::json;

/// Input for registering a push subscription.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeInput {
    /// Push service endpoint URL
    pub endpoint: String,
    /// P256DH public key (base64 URL-safe encoded)
    pub p256dh: String,
    /// Auth secret (base64 URL-safe encoded)
    pub auth: String,
}

/// Push notification service.
#[derive(Clone)]
pub struct PushService {
    repo: PushSubscriptionRepository,
    config: PushConfig,
    http_client: reqwest::Client,
    id_gen: IdGenerator,
}

impl PushService {
    /// Create a new push service.
    #[must_use]
    pub fn new(repo: PushSubscriptionRepository, config: PushConfig) -> Self {
        Self {
            repo,
            config,
            http_client: reqwest::Client::new(),
            id_gen: IdGenerator::new(),
        }
    }

    /// Whether delivery is configured at all.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.config.vapid_public_key.is_some() && self.config.vapid_private_key.is_some()
    }

    /// Register a push subscription for a user.
    ///
    /// Re-registering an endpoint replaces the stored keys.
    pub async fn subscribe(
        &self,
        user_id: &str,
        input: SubscribeInput,
    ) -> AppResult<push_subscription::Model> {
        if let Some(existing) = self.repo.find_by_endpoint(&input.endpoint).await? {
            self.repo.delete(&existing.id).await?;
        }

        let model = push_subscription::ActiveModel {
            id: Set(self.id_gen.generate()),
            user_id: Set(user_id.to_string()),
            endpoint: Set(input.endpoint),
            p256dh: Set(input.p256dh),
            auth: Set(input.auth),
            created_at: Set(chrono::Utc::now().into()),
        };

        self.repo.create(model).await
    }

    /// Send a title/body payload to all of a user's subscriptions.
    ///
    /// Never fails the caller: transport errors are logged, and
    /// subscriptions the push service reports gone are pruned.
    pub async fn send_to_user(&self, user_id: &str, title: &str, body: Option<&str>) {
        if !self.is_enabled() {
            return;
        }

        let subscriptions = match self.repo.find_by_user(user_id).await {
            Ok(subscriptions) => subscriptions,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load push subscriptions");
                return;
            }
        };

        for subscription in subscriptions {
            self.send_one(&subscription, title, body).await;
        }
    }

    async fn send_one(&self, subscription: &push_subscription::Model, title: &str, body: Option<&str>) {
        let payload = json!({
            "title": title,
            "body": body,
        });

        let result = self
            .http_client
            .post(&subscription.endpoint)
            .header("TTL", "86400")
            .json(&payload)
            .send()
            .await;

        match result {
            Ok(response) if response.status() == 404 || response.status() == 410 => {
                // The push service no longer knows this subscription.
                tracing::debug!(endpoint = %subscription.endpoint, "Pruning gone push subscription");
                if let Err(e) = self.repo.delete(&subscription.id).await {
                    tracing::warn!(error = %e, "Failed to prune push subscription");
                }
            }
            Ok(response) if !response.status().is_success() => {
                tracing::warn!(
                    endpoint = %subscription.endpoint,
                    status = %response.status(),
                    "Push delivery rejected"
                );
            }
            Ok(_) => {
                tracing::debug!(endpoint = %subscription.endpoint, "Push delivered");
            }
            Err(e) => {
                tracing::warn!(error = %e, "Push delivery failed");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn unkeyed_service() -> PushService {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        PushService::new(PushSubscriptionRepository::new(db), PushConfig::default())
    }

    #[test]
    fn test_unkeyed_config_disables_delivery() {
        assert!(!unkeyed_service().is_enabled());
    }

    #[tokio::test]
    async fn test_send_to_user_is_noop_when_disabled() {
        // No query results queued: any DB access would fail the test.
        unkeyed_service().send_to_user("u1", "Hello", None).await;
    }
}
