//! HTTP API layer for love8.
//!
//! This crate provides the REST API and real-time streaming:
//!
//! - **Endpoints**: auth, profiles, traits, endorsements, notifications,
//!   besties, suggestions, push
//! - **Extractors**: authentication
//! - **Middleware**: bearer-token auth
//! - **Streaming**: Server-Sent Events for the feed and per-user updates
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod sse;

pub use endpoints::router;
pub use middleware::AppState;
pub use sse::{SseBroadcaster, SseEvent, SsePublisher};
