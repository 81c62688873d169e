//! Event publisher service.
//!
//! Provides an abstraction for publishing real-time events.
//! The actual implementation is provided by the API layer
//! (broadcast channels feeding SSE streams).

use async_trait::async_trait;
use love8_common::AppResult;
use love8_db::entities::{notification, traits};
use std::sync::Arc;

/// Event types for real-time updates.
#[derive(Debug, Clone)]
pub enum StreamEvent {
    /// A trait was created. Carries the full row so consumers can
    /// apply it as a delta without a re-fetch.
    TraitCreated {
        user_id: String,
        payload: traits::Model,
    },
    /// A trait was updated (endorsement count, description).
    TraitUpdated {
        user_id: String,
        payload: traits::Model,
    },
    /// An endorsement arrived in a recipient's inbox.
    EndorsementReceived {
        recipient_id: String,
        endorsement_id: String,
        trait_id: String,
    },
    /// A pending endorsement was approved by its recipient.
    EndorsementApproved {
        recipient_id: String,
        endorsement_id: String,
        trait_id: String,
    },
    /// A new notification was created.
    NotificationCreated {
        user_id: String,
        payload: notification::Model,
    },
    /// A bestie request was sent.
    BestieRequested {
        requester_id: String,
        recipient_id: String,
    },
    /// A bestie request was accepted.
    BestieAccepted {
        requester_id: String,
        recipient_id: String,
    },
}

/// Trait for publishing real-time events.
///
/// This allows the core services to publish events
/// without directly depending on the streaming implementation.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a trait created event.
    async fn publish_trait_created(&self, payload: &traits::Model) -> AppResult<()>;

    /// Publish a trait updated event.
    async fn publish_trait_updated(&self, payload: &traits::Model) -> AppResult<()>;

    /// Publish an endorsement received event.
    async fn publish_endorsement_received(
        &self,
        recipient_id: &str,
        endorsement_id: &str,
        trait_id: &str,
    ) -> AppResult<()>;

    /// Publish an endorsement approved event.
    async fn publish_endorsement_approved(
        &self,
        recipient_id: &str,
        endorsement_id: &str,
        trait_id: &str,
    ) -> AppResult<()>;

    /// Publish a notification event.
    async fn publish_notification(&self, payload: &notification::Model) -> AppResult<()>;

    /// Publish a bestie requested event.
    async fn publish_bestie_requested(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> AppResult<()>;

    /// Publish a bestie accepted event.
    async fn publish_bestie_accepted(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> AppResult<()>;
}

/// A no-op implementation of `EventPublisher` for testing or when
/// real-time events are disabled.
#[derive(Clone, Default)]
pub struct NoOpEventPublisher;

#[async_trait]
impl EventPublisher for NoOpEventPublisher {
    async fn publish_trait_created(&self, _payload: &traits::Model) -> AppResult<()> {
        Ok(())
    }

    async fn publish_trait_updated(&self, _payload: &traits::Model) -> AppResult<()> {
        Ok(())
    }

    async fn publish_endorsement_received(
        &self,
        _recipient_id: &str,
        _endorsement_id: &str,
        _trait_id: &str,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn publish_endorsement_approved(
        &self,
        _recipient_id: &str,
        _endorsement_id: &str,
        _trait_id: &str,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn publish_notification(&self, _payload: &notification::Model) -> AppResult<()> {
        Ok(())
    }

    async fn publish_bestie_requested(
        &self,
        _requester_id: &str,
        _recipient_id: &str,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn publish_bestie_accepted(
        &self,
        _requester_id: &str,
        _recipient_id: &str,
    ) -> AppResult<()> {
        Ok(())
    }
}

/// Wrapper for boxed `EventPublisher` trait object.
pub type EventPublisherService = Arc<dyn EventPublisher>;
