//! Love8 server entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, middleware};
use love8_api::{AppState, SseBroadcaster, SsePublisher, router as api_router, sse};
use love8_common::Config;
use love8_core::{
    BestieService, EndorsementService, EventPublisherService, NotificationService, ProfileService,
    PushService, SuggestionService, TraitService,
};
use love8_db::repositories::{
    BestieRelationshipRepository, EndorsementRepository, NotificationRepository, ProfileRepository,
    PushSubscriptionRepository, TraitRepository,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if signal::ctrl_c().await.is_err() {
            tracing::error!("Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "love8=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting love8 server...");

    // Load configuration
    let config = Config::load()?;

    // Connect to database and run migrations
    let db = love8_db::init(&config).await?;
    info!("Connected to database");

    info!("Running database migrations...");
    love8_db::migrate(&db).await?;
    info!("Migrations completed");

    // Initialize repositories
    let db = Arc::new(db);
    let profile_repo = ProfileRepository::new(Arc::clone(&db));
    let trait_repo = TraitRepository::new(Arc::clone(&db));
    let endorsement_repo = EndorsementRepository::new(Arc::clone(&db));
    let notification_repo = NotificationRepository::new(Arc::clone(&db));
    let bestie_repo = BestieRelationshipRepository::new(Arc::clone(&db));
    let push_subscription_repo = PushSubscriptionRepository::new(Arc::clone(&db));

    // Initialize SSE broadcaster and the event publisher over it
    let sse_broadcaster = SseBroadcaster::new();
    let event_publisher: EventPublisherService =
        Arc::new(SsePublisher::new(sse_broadcaster.clone()));

    // Initialize services
    let profile_service = ProfileService::new(profile_repo.clone());

    let push_service = PushService::new(push_subscription_repo, config.push.clone());

    let mut notification_service = NotificationService::new(notification_repo);
    notification_service.set_event_publisher(event_publisher.clone());
    notification_service.set_push(push_service.clone());

    let mut trait_service = TraitService::new(trait_repo.clone());
    trait_service.set_event_publisher(event_publisher.clone());

    let mut endorsement_service =
        EndorsementService::new(endorsement_repo, trait_repo.clone(), profile_repo);
    endorsement_service.set_notifications(notification_service.clone());
    endorsement_service.set_event_publisher(event_publisher.clone());

    let mut bestie_service = BestieService::new(bestie_repo, trait_repo);
    bestie_service.set_event_publisher(event_publisher);

    let suggestion_service = SuggestionService::new(config.suggestions.clone());

    // Create app state
    let state = AppState {
        profile_service,
        trait_service,
        endorsement_service,
        notification_service,
        bestie_service,
        suggestion_service,
        push_service,
        sse_broadcaster,
    };

    // Build router
    let app = Router::new()
        .nest("/api", api_router())
        .nest("/streams", sse::router())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            love8_api::middleware::auth_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}
