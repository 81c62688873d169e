//! Notification endpoints.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use love8_common::AppResult;
use love8_db::entities::notification::Model as NotificationModel;
use serde::Serialize;

use crate::{extractors::AuthUser, middleware::AppState, response::ApiResponse};

/// Notification response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

impl From<NotificationModel> for NotificationResponse {
    fn from(n: NotificationModel) -> Self {
        Self {
            id: n.id,
            title: n.title,
            body: n.body,
            is_read: n.is_read,
            created_at: n.created_at.to_rfc3339(),
        }
    }
}

/// Notifications list with unread count.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsListResponse {
    pub notifications: Vec<NotificationResponse>,
    pub unread_count: u64,
}

/// List your notifications, newest first.
async fn list(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<NotificationsListResponse>> {
    let notifications = state.notification_service.list(&profile.user_id).await?;
    let unread_count = state
        .notification_service
        .count_unread(&profile.user_id)
        .await?;

    Ok(ApiResponse::ok(NotificationsListResponse {
        notifications: notifications.into_iter().map(Into::into).collect(),
        unread_count,
    }))
}

/// Read-state response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadResponse {
    pub ok: bool,
}

/// Mark one notification as read.
async fn mark_read(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<ReadResponse>> {
    state
        .notification_service
        .mark_as_read(&profile.user_id, &id)
        .await?;
    Ok(ApiResponse::ok(ReadResponse { ok: true }))
}

/// Mark-all response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadAllResponse {
    pub updated: u64,
}

/// Mark all notifications as read.
async fn mark_all_read(
    AuthUser(profile): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<ReadAllResponse>> {
    let updated = state
        .notification_service
        .mark_all_as_read(&profile.user_id)
        .await?;
    Ok(ApiResponse::ok(ReadAllResponse { updated }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(list))
        .route("/{id}/read", post(mark_read))
        .route("/read-all", post(mark_all_read))
}
