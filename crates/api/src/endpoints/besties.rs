//! Bestie relationship endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use love8_common::AppResult;
use love8_db::entities::bestie_relationship;
use serde::{Deserialize, Serialize};

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Bestie request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestieRequest {
    /// Username of the user to bestie.
    pub username: String,
}

/// Send a bestie request.
async fn request(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<BestieRequest>,
) -> AppResult<ApiResponse<bestie_relationship::Model>> {
    let recipient = state.profile_service.get_by_username(&req.username).await?;

    let created = state
        .bestie_service
        .request(&profile.user_id, &recipient.user_id)
        .await?;

    Ok(ApiResponse::ok(created))
}

/// Accept response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptResponse {
    pub ok: bool,
}

/// Accept a pending bestie request addressed to you.
async fn accept(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<AcceptResponse>> {
    state.bestie_service.accept(&profile.user_id, &id).await?;
    Ok(ApiResponse::ok(AcceptResponse { ok: true }))
}

/// The caller's bestie state: accepted relationship (with mutual traits)
/// and pending incoming requests.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BestieStateResponse {
    pub relationship: Option<bestie_relationship::Model>,
    pub mutual_traits: Vec<String>,
    pub pending_requests: Vec<bestie_relationship::Model>,
}

/// Your bestie relationship and pending requests.
async fn mine(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<BestieStateResponse>> {
    let relationship = state.bestie_service.bestie_of(&profile.user_id).await?;

    let mutual_traits = match &relationship {
        Some(rel) => {
            let partner = if rel.requester_id == profile.user_id {
                &rel.recipient_id
            } else {
                &rel.requester_id
            };
            state
                .bestie_service
                .mutual_traits(&profile.user_id, partner)
                .await?
        }
        None => Vec::new(),
    };

    let pending_requests = state
        .bestie_service
        .pending_requests(&profile.user_id)
        .await?;

    Ok(ApiResponse::ok(BestieStateResponse {
        relationship,
        mutual_traits,
        pending_requests,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(request))
        .route("/{id}/accept", post(accept))
        .route("/mine", get(mine))
}
