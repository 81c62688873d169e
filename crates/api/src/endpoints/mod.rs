//! API endpoints.

#![allow(missing_docs)]

pub mod auth;
pub mod besties;
pub mod endorsements;
pub mod notifications;
pub mod profiles;
pub mod push;
pub mod suggestions;
pub mod traits;

use axum::Router;

use crate::middleware::AppState;

/// Assemble the `/api` router.
#[must_use]
pub fn router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profiles", profiles::router())
        .nest("/traits", traits::router())
        .nest("/endorsements", endorsements::router())
        .nest("/notifications", notifications::router())
        .nest("/besties", besties::router())
        .nest("/suggestions", suggestions::router())
        .nest("/push", push::router())
}
