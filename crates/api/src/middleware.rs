//! API middleware.

#![allow(missing_docs)]

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use love8_core::{
    BestieService, EndorsementService, NotificationService, ProfileService, PushService,
    SuggestionService, TraitService,
};

use crate::sse::SseBroadcaster;

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub profile_service: ProfileService,
    pub trait_service: TraitService,
    pub endorsement_service: EndorsementService,
    pub notification_service: NotificationService,
    pub bestie_service: BestieService,
    pub suggestion_service: SuggestionService,
    pub push_service: PushService,
    pub sse_broadcaster: SseBroadcaster,
}

/// Authentication middleware.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    // Try to extract token from header
    if let Some(auth_header) = req.headers().get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        // Authenticate profile by token
        if let Ok(profile) = state.profile_service.authenticate_by_token(token).await {
            req.extensions_mut().insert(profile);
        }
    }

    next.run(req).await
}
