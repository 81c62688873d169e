//! API integration tests.
//!
//! These tests verify the API endpoints work correctly together.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::redundant_clone)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use love8_api::{SseBroadcaster, middleware::AppState, router as api_router};
use love8_common::config::{PushConfig, SuggestionConfig};
use love8_core::{
    BestieService, EndorsementService, NotificationService, ProfileService, PushService,
    SuggestionService, TraitService,
};
use love8_db::entities::traits;
use love8_db::repositories::{
    BestieRelationshipRepository, EndorsementRepository, NotificationRepository, ProfileRepository,
    PushSubscriptionRepository, TraitRepository,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use std::sync::Arc;
use tower::ServiceExt;

/// Create an empty mock database connection.
fn create_mock_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres)
        .append_exec_results([MockExecResult {
            last_insert_id: 0,
            rows_affected: 1,
        }])
        .into_connection()
}

/// Create test app state with mock databases.
fn create_test_state(trait_db: DatabaseConnection) -> AppState {
    let db = Arc::new(create_mock_db());
    let trait_db = Arc::new(trait_db);

    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let trait_repo = TraitRepository::new(Arc::clone(&trait_db));
    let endorsement_repo = EndorsementRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let bestie_repo = BestieRelationshipRepository::new(Arc::clone(&db));
    let push_subscription_repo = PushSubscriptionRepository::new(Arc::clone(&db));

    let profile_service = ProfileService::new(profile_repo.clone());
    let trait_service = TraitService::new(trait_repo.clone());
    let endorsement_service =
        EndorsementService::new(endorsement_repo, trait_repo.clone(), profile_repo);
    let notification_service = NotificationService::new(notification_repo);
    let bestie_service = BestieService::new(bestie_repo, trait_repo);
    let suggestion_service = SuggestionService::new(SuggestionConfig::default());
    let push_service = PushService::new(push_subscription_repo, PushConfig::default());

    AppState {
        profile_service,
        trait_service,
        endorsement_service,
        notification_service,
        bestie_service,
        suggestion_service,
        push_service,
        sse_broadcaster: SseBroadcaster::new(),
    }
}

/// Assemble the app exactly as the server binary does.
fn create_test_app(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            love8_api::middleware::auth_middleware,
        ))
        .with_state(state)
}

#[tokio::test]
async fn test_protected_endpoint_requires_auth() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/traits/mine")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_notifications_require_auth() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/notifications/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signup_validates_password_length() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/signup")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"username": "ada", "password": "short"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_feed_is_public_and_returns_stats() {
    // The feed query hits the trait database once and finds nothing.
    let trait_db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<traits::Model>::new()])
        .into_connection();
    let app = create_test_app(create_test_state(trait_db));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/traits/feed?sort=trending")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["data"]["stats"]["total"], 0);
    assert_eq!(json["data"]["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app(create_test_state(create_mock_db()));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nope")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
