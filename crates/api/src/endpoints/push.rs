//! Push subscription endpoints.

use axum::{Json, Router, extract::State, routing::post};
use love8_common::AppResult;
use love8_db::entities::push_subscription;
use serde::Deserialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Subscribe request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

/// Register a push subscription for the authenticated user.
async fn subscribe(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Json(req): Json<SubscribeRequest>,
) -> AppResult<ApiResponse<push_subscription::Model>> {
    let input = love8_core::push::SubscribeInput {
        endpoint: req.endpoint,
        p256dh: req.p256dh,
        auth: req.auth,
    };

    let created = state.push_service.subscribe(&profile.user_id, input).await?;

    Ok(ApiResponse::ok(created))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/subscribe", post(subscribe))
}
