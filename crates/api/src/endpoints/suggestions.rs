//! AI suggestion endpoints.
//!
//! Every operation degrades to a deterministic fallback; these handlers
//! can fail only on the trait queries feeding the prompts.

use axum::{Json, Router, extract::State, routing::post};
use love8_common::AppResult;
use love8_core::{CaptionOutcome, CompatibilityOutcome, DescriptionOutcome, SuggestionOutcome};
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Suggest 5 traits for the authenticated user's profile.
async fn suggest_traits(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<SuggestionOutcome>> {
    let existing: Vec<String> = state
        .trait_service
        .list_own(&profile.user_id)
        .await?
        .into_iter()
        .map(|t| t.word)
        .collect();

    let outcome = state
        .suggestion_service
        .suggest_traits(profile.bio.as_deref(), &existing)
        .await;

    Ok(ApiResponse::ok(outcome))
}

/// Description request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DescriptionRequest {
    pub word: String,
    pub context: Option<String>,
}

/// Generate a short description for a trait word.
async fn describe(
    AuthUser(_profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<DescriptionRequest>,
) -> AppResult<ApiResponse<DescriptionOutcome>> {
    let outcome = state
        .suggestion_service
        .describe_trait(&req.word, req.context.as_deref())
        .await;
    Ok(ApiResponse::ok(outcome))
}

/// Caption request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionRequest {
    pub word: String,
}

/// Generate a shareable caption for a trait.
async fn caption(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CaptionRequest>,
) -> AppResult<ApiResponse<CaptionOutcome>> {
    let user_name = profile.display_name.unwrap_or(profile.username);
    let outcome = state
        .suggestion_service
        .share_caption(&req.word, &user_name)
        .await;
    Ok(ApiResponse::ok(outcome))
}

/// Compatibility request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompatibilityRequest {
    /// Username of the other person.
    pub username: String,
}

/// Score trait compatibility between you and another user.
async fn compatibility(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CompatibilityRequest>,
) -> AppResult<ApiResponse<CompatibilityOutcome>> {
    let other = state.profile_service.get_by_username(&req.username).await?;

    let own_words: Vec<String> = state
        .trait_service
        .list_own(&profile.user_id)
        .await?
        .into_iter()
        .map(|t| t.word)
        .collect();
    let other_words: Vec<String> = state
        .trait_service
        .list_own(&other.user_id)
        .await?
        .into_iter()
        .map(|t| t.word)
        .collect();

    let outcome = state
        .suggestion_service
        .compatibility(&own_words, &other_words)
        .await;

    Ok(ApiResponse::ok(outcome))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/traits", post(suggest_traits))
        .route("/description", post(describe))
        .route("/caption", post(caption))
        .route("/compatibility", post(compatibility))
}
