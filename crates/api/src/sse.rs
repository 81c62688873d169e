//! Server-Sent Events (SSE) for real-time updates.
//!
//! Provides SSE streams for the public feed and per-user updates, and
//! the broadcast-backed [`SsePublisher`] that core services publish
//! through. Dropping a stream drops its broadcast receiver, which is
//! all the teardown a subscription needs.

#![allow(missing_docs)]

use std::convert::Infallible;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    Router,
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use futures::stream::{self, Stream};
use love8_common::AppResult;
use love8_core::EventPublisher;
use love8_db::entities::{notification, traits};
use serde::Serialize;
use tokio::sync::broadcast;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;

use crate::{extractors::AuthUser, middleware::AppState};

/// SSE event types.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SseEvent {
    /// New trait in the public feed.
    TraitCreated { payload: traits::Model },
    /// A trait changed (endorsement count, description).
    TraitUpdated { payload: traits::Model },
    /// An endorsement arrived in your inbox.
    EndorsementReceived {
        endorsement_id: String,
        trait_id: String,
    },
    /// Your endorsement was approved.
    EndorsementApproved {
        endorsement_id: String,
        trait_id: String,
    },
    /// New notification.
    Notification { payload: notification::Model },
    /// A bestie request arrived.
    BestieRequested { requester_id: String },
    /// Your bestie request was accepted.
    BestieAccepted { recipient_id: String },
    /// Connection established.
    Connected,
}

/// SSE broadcast channels for different streams.
#[derive(Clone)]
pub struct SseBroadcaster {
    /// Public feed events.
    pub feed: broadcast::Sender<SseEvent>,
    /// User-specific events (keyed by user ID).
    user_channels: std::sync::Arc<
        tokio::sync::RwLock<std::collections::HashMap<String, broadcast::Sender<SseEvent>>>,
    >,
}

impl SseBroadcaster {
    /// Create a new SSE broadcaster.
    #[must_use]
    pub fn new() -> Self {
        let (feed, _) = broadcast::channel(1000);

        Self {
            feed,
            user_channels: std::sync::Arc::new(tokio::sync::RwLock::new(
                std::collections::HashMap::new(),
            )),
        }
    }

    /// Get or create a user-specific channel.
    pub async fn user_channel(&self, user_id: &str) -> broadcast::Sender<SseEvent> {
        let mut channels = self.user_channels.write().await;

        if let Some(sender) = channels.get(user_id)
            && sender.receiver_count() > 0
        {
            return sender.clone();
        }

        let (sender, _) = broadcast::channel(100);
        channels.insert(user_id.to_string(), sender.clone());
        sender
    }

    /// Broadcast an event to the public feed.
    pub fn broadcast_feed(&self, event: SseEvent) {
        let _ = self.feed.send(event);
    }

    /// Broadcast an event to a specific user.
    pub async fn broadcast_to_user(&self, user_id: &str, event: SseEvent) {
        let channels = self.user_channels.read().await;
        if let Some(sender) = channels.get(user_id) {
            let _ = sender.send(event);
        }
    }

    /// Clean up inactive user channels.
    pub async fn cleanup(&self) {
        let mut channels = self.user_channels.write().await;
        channels.retain(|_, sender| sender.receiver_count() > 0);
    }
}

impl Default for SseBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Event publisher backed by the SSE broadcaster.
#[derive(Clone)]
pub struct SsePublisher {
    broadcaster: SseBroadcaster,
}

impl SsePublisher {
    /// Create a publisher over a broadcaster.
    #[must_use]
    pub const fn new(broadcaster: SseBroadcaster) -> Self {
        Self { broadcaster }
    }
}

#[async_trait]
impl EventPublisher for SsePublisher {
    async fn publish_trait_created(&self, payload: &traits::Model) -> AppResult<()> {
        let event = SseEvent::TraitCreated {
            payload: payload.clone(),
        };
        self.broadcaster.broadcast_feed(event.clone());
        self.broadcaster
            .broadcast_to_user(&payload.user_id, event)
            .await;
        Ok(())
    }

    async fn publish_trait_updated(&self, payload: &traits::Model) -> AppResult<()> {
        let event = SseEvent::TraitUpdated {
            payload: payload.clone(),
        };
        self.broadcaster.broadcast_feed(event.clone());
        self.broadcaster
            .broadcast_to_user(&payload.user_id, event)
            .await;
        Ok(())
    }

    async fn publish_endorsement_received(
        &self,
        recipient_id: &str,
        endorsement_id: &str,
        trait_id: &str,
    ) -> AppResult<()> {
        self.broadcaster
            .broadcast_to_user(
                recipient_id,
                SseEvent::EndorsementReceived {
                    endorsement_id: endorsement_id.to_string(),
                    trait_id: trait_id.to_string(),
                },
            )
            .await;
        Ok(())
    }

    async fn publish_endorsement_approved(
        &self,
        recipient_id: &str,
        endorsement_id: &str,
        trait_id: &str,
    ) -> AppResult<()> {
        self.broadcaster
            .broadcast_to_user(
                recipient_id,
                SseEvent::EndorsementApproved {
                    endorsement_id: endorsement_id.to_string(),
                    trait_id: trait_id.to_string(),
                },
            )
            .await;
        Ok(())
    }

    async fn publish_notification(&self, payload: &notification::Model) -> AppResult<()> {
        self.broadcaster
            .broadcast_to_user(
                &payload.user_id,
                SseEvent::Notification {
                    payload: payload.clone(),
                },
            )
            .await;
        Ok(())
    }

    async fn publish_bestie_requested(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> AppResult<()> {
        self.broadcaster
            .broadcast_to_user(
                recipient_id,
                SseEvent::BestieRequested {
                    requester_id: requester_id.to_string(),
                },
            )
            .await;
        Ok(())
    }

    async fn publish_bestie_accepted(
        &self,
        requester_id: &str,
        recipient_id: &str,
    ) -> AppResult<()> {
        self.broadcaster
            .broadcast_to_user(
                requester_id,
                SseEvent::BestieAccepted {
                    recipient_id: recipient_id.to_string(),
                },
            )
            .await;
        Ok(())
    }
}

/// Public feed SSE stream.
async fn feed_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.sse_broadcaster.feed.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    // Add initial connected event
    let initial = stream::once(async {
        Ok(Event::default()
            .json_data(&SseEvent::Connected)
            .unwrap_or_else(|_| Event::default().data("connected")))
    });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// User-specific SSE stream (notifications, endorsements, besties).
async fn user_stream(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let sender = state.sse_broadcaster.user_channel(&profile.user_id).await;
    let rx = sender.subscribe();

    let stream = BroadcastStream::new(rx).filter_map(|result| {
        result.ok().map(|event| {
            Ok(Event::default()
                .json_data(&event)
                .unwrap_or_else(|_| Event::default().data("error")))
        })
    });

    let initial = stream::once(async {
        Ok(Event::default()
            .json_data(&SseEvent::Connected)
            .unwrap_or_else(|_| Event::default().data("connected")))
    });

    Sse::new(initial.chain(stream)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(30))
            .text("ping"),
    )
}

/// Create SSE router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed_stream))
        .route("/user", get(user_stream))
}
