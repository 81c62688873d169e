//! Endorsement endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use love8_common::AppResult;
use love8_core::PendingEndorsement;
use love8_db::entities::endorsement;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Create endorsement request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEndorsementRequest {
    pub trait_id: String,

    #[validate(length(max = 500))]
    pub message: Option<String>,
}

/// Endorse another user's trait.
async fn create_endorsement(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEndorsementRequest>,
) -> AppResult<ApiResponse<endorsement::Model>> {
    req.validate()?;

    let input = love8_core::endorsement::CreateEndorsementInput {
        trait_id: req.trait_id,
        message: req.message,
    };

    let created = state
        .endorsement_service
        .endorse(&profile.user_id, input)
        .await?;

    Ok(ApiResponse::ok(created))
}

/// Your pending endorsement inbox.
async fn pending(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<PendingEndorsement>>> {
    let inbox = state
        .endorsement_service
        .pending_inbox(&profile.user_id)
        .await?;
    Ok(ApiResponse::ok(inbox))
}

/// Resolution response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    pub ok: bool,
}

/// Approve a pending endorsement. Repeating the call is a no-op.
async fn approve(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ResolveResponse>> {
    state
        .endorsement_service
        .approve(&profile.user_id, &id)
        .await?;
    Ok(ApiResponse::ok(ResolveResponse { ok: true }))
}

/// Decline a pending endorsement.
async fn decline(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ResolveResponse>> {
    state
        .endorsement_service
        .decline(&profile.user_id, &id)
        .await?;
    Ok(ApiResponse::ok(ResolveResponse { ok: true }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_endorsement))
        .route("/pending", get(pending))
        .route("/{id}/approve", post(approve))
        .route("/{id}/decline", post(decline))
}
