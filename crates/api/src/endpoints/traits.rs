//! Trait and feed endpoints.

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::{get, post},
};
use love8_common::AppResult;
use love8_core::{FeedComposer, FeedSort, FeedStats, TraitWithAuthor};
use love8_db::entities::traits;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// The feed query is capped server-side.
const FEED_LIMIT: u64 = 500;

/// Create trait request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTraitRequest {
    pub word: String,

    #[validate(length(max = 100))]
    pub description: Option<String>,

    #[serde(default)]
    pub ai_suggested: bool,
}

/// Add a trait to your own profile.
async fn create_trait(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<CreateTraitRequest>,
) -> AppResult<ApiResponse<traits::Model>> {
    req.validate()?;

    let input = love8_core::traits::CreateTraitInput {
        word: req.word,
        description: req.description,
        ai_suggested: req.ai_suggested,
    };

    let created = state.trait_service.add(&profile.user_id, input).await?;

    Ok(ApiResponse::ok(created))
}

/// List your own approved traits, most endorsed first.
async fn mine(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<traits::Model>>> {
    let traits = state.trait_service.list_own(&profile.user_id).await?;
    Ok(ApiResponse::ok(traits))
}

/// Feed query parameters.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub sort: FeedSort,
    /// Case-insensitive search across word, display name and username.
    pub q: Option<String>,
}

/// Feed response: ordered entries plus aggregate statistics over the
/// filtered subset.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedResponse {
    pub items: Vec<TraitWithAuthor>,
    pub stats: FeedStats,
}

/// The public trait feed.
async fn feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> AppResult<ApiResponse<FeedResponse>> {
    let entries = state.trait_service.feed(FEED_LIMIT).await?;

    let filtered = match query.q.as_deref() {
        Some(q) => FeedComposer::search(entries, q),
        None => entries,
    };

    let stats = FeedComposer::stats(&filtered);
    let items = FeedComposer::sort(filtered, query.sort, chrono::Utc::now());

    Ok(ApiResponse::ok(FeedResponse { items, stats }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(create_trait))
        .route("/mine", get(mine))
        .route("/feed", get(feed))
}
