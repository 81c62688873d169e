//! Profile endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use love8_common::AppResult;
use love8_db::entities::profile;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Public profile response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub user_id: String,
    pub username: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub social_links: serde_json::Value,
    pub endorsement_count: i32,
    pub created_at: String,
}

impl From<profile::Model> for ProfileResponse {
    fn from(p: profile::Model) -> Self {
        Self {
            user_id: p.user_id,
            username: p.username,
            display_name: p.display_name,
            avatar_url: p.avatar_url,
            bio: p.bio,
            social_links: p.social_links,
            endorsement_count: p.endorsement_count,
            created_at: p.created_at.to_rfc3339(),
        }
    }
}

/// Get the authenticated user's profile.
async fn me(AuthUser(profile): AuthUser) -> AppResult<ApiResponse<ProfileResponse>> {
    Ok(ApiResponse::ok(profile.into()))
}

/// Profile update request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(length(max = 256))]
    pub display_name: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    #[validate(length(max = 512))]
    pub avatar_url: Option<String>,

    pub social_links: Option<serde_json::Value>,
}

/// Update the authenticated user's profile.
async fn update_me(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<UpdateProfileRequest>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    req.validate()?;

    let input = love8_core::profile::UpdateProfileInput {
        display_name: req.display_name,
        bio: req.bio,
        avatar_url: req.avatar_url,
        social_links: req.social_links,
    };

    let updated = state.profile_service.update(&profile.user_id, input).await?;

    Ok(ApiResponse::ok(updated.into()))
}

/// Look up a profile by username.
async fn by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<ApiResponse<ProfileResponse>> {
    let profile = state.profile_service.get_by_username(&username).await?;
    Ok(ApiResponse::ok(profile.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(me).patch(update_me))
        .route("/{username}", get(by_username))
}
