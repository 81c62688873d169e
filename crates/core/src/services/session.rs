//! Session manager.
//!
//! Tracks the signed-in identity and its derived profile record as an
//! explicitly constructed object with an init/teardown lifecycle, fed
//! by an external auth-state stream. Nothing here is process-global;
//! whichever layer needs the session holds a handle to it.

use crate::services::profile::ProfileService;
use async_trait::async_trait;
use love8_common::AppResult;
use love8_db::entities::profile;
use std::sync::Arc;
use tokio::sync::RwLock;

/// External identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
}

/// Auth-state-change events delivered by the provider.
#[derive(Debug, Clone)]
pub enum AuthEvent {
    /// A session was established.
    SignedIn(Identity),
    /// The session ended (expiry, remote sign-out).
    SignedOut,
}

/// Narrow seam over the external auth surface.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Fetch the currently established identity, if any.
    async fn current_identity(&self) -> AppResult<Option<Identity>>;

    /// End the external session. Callers treat this as fire-and-forget.
    async fn sign_out(&self) -> AppResult<()>;
}

/// A readable snapshot of session state.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub identity: Option<Identity>,
    pub profile: Option<profile::Model>,
    pub loading: bool,
}

/// Session manager.
#[derive(Clone)]
pub struct SessionManager {
    provider: Arc<dyn AuthProvider>,
    profiles: ProfileService,
    state: Arc<RwLock<SessionSnapshot>>,
}

impl SessionManager {
    /// Create a session manager in its initial (loading) state.
    #[must_use]
    pub fn new(provider: Arc<dyn AuthProvider>, profiles: ProfileService) -> Self {
        Self {
            provider,
            profiles,
            state: Arc::new(RwLock::new(SessionSnapshot {
                identity: None,
                profile: None,
                loading: true,
            })),
        }
    }

    /// Establish the session: fetch the current external identity and
    /// resolve its profile, provisioning one on first sign-in.
    pub async fn init(&self) -> AppResult<()> {
        {
            let mut state = self.state.write().await;
            state.loading = true;
        }

        let identity = self.provider.current_identity().await?;

        let profile = match &identity {
            Some(identity) => self.resolve_profile(identity).await,
            None => None,
        };

        let mut state = self.state.write().await;
        state.identity = identity;
        state.profile = profile;
        state.loading = false;
        Ok(())
    }

    /// Apply an auth-state-change event.
    pub async fn handle_auth_event(&self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(identity) => {
                let profile = self.resolve_profile(&identity).await;
                let mut state = self.state.write().await;
                state.identity = Some(identity);
                state.profile = profile;
                state.loading = false;
            }
            AuthEvent::SignedOut => {
                let mut state = self.state.write().await;
                state.identity = None;
                state.profile = None;
                state.loading = false;
            }
        }
    }

    /// End the session.
    ///
    /// The external sign-out is fire-and-forget: a failure is logged and
    /// local state is cleared unconditionally either way.
    pub async fn logout(&self) {
        if let Err(e) = self.provider.sign_out().await {
            tracing::warn!(error = %e, "External sign-out failed");
        }

        let mut state = self.state.write().await;
        state.identity = None;
        state.profile = None;
        state.loading = false;
    }

    /// Re-resolve the profile for the current identity.
    pub async fn refresh_profile(&self) {
        let identity = self.state.read().await.identity.clone();
        if let Some(identity) = identity {
            let profile = self.resolve_profile(&identity).await;
            self.state.write().await.profile = profile;
        }
    }

    /// Read the current session state.
    pub async fn snapshot(&self) -> SessionSnapshot {
        self.state.read().await.clone()
    }

    /// Look up the identity's profile, synthesizing a default one on
    /// first sign-in. Resolution failures are logged and leave the
    /// profile unset rather than failing the session.
    async fn resolve_profile(&self, identity: &Identity) -> Option<profile::Model> {
        match self.profiles.find(&identity.id).await {
            Ok(Some(existing)) => Some(existing),
            Ok(None) => {
                match self
                    .profiles
                    .provision(
                        &identity.id,
                        identity.display_name.as_deref(),
                        identity.email.as_deref(),
                        identity.avatar_url.as_deref(),
                    )
                    .await
                {
                    Ok(created) => Some(created),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to provision profile");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load profile");
                None
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use love8_common::AppError;
    use love8_db::repositories::ProfileRepository;
    use sea_orm::{DatabaseBackend, MockDatabase};

    struct StubProvider {
        identity: Option<Identity>,
        sign_out_fails: bool,
    }

    #[async_trait]
    impl AuthProvider for StubProvider {
        async fn current_identity(&self) -> AppResult<Option<Identity>> {
            Ok(self.identity.clone())
        }

        async fn sign_out(&self) -> AppResult<()> {
            if self.sign_out_fails {
                Err(AppError::ExternalService("auth provider down".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn test_identity() -> Identity {
        Identity {
            id: "u1".to_string(),
            email: Some("ada@example.com".to_string()),
            display_name: Some("Ada Lovelace".to_string()),
            avatar_url: None,
        }
    }

    fn test_profile(user_id: &str) -> profile::Model {
        profile::Model {
            user_id: user_id.to_string(),
            username: "ada42".to_string(),
            username_lower: "ada42".to_string(),
            display_name: Some("Ada Lovelace".to_string()),
            avatar_url: None,
            bio: Some(String::new()),
            social_links: serde_json::json!({}),
            endorsement_count: 0,
            password: None,
            token: Some("token".to_string()),
            created_at: chrono::Utc::now().into(),
            updated_at: None,
        }
    }

    fn profiles_with(db: MockDatabase) -> ProfileService {
        ProfileService::new(ProfileRepository::new(Arc::new(db.into_connection())))
    }

    #[tokio::test]
    async fn test_starts_loading() {
        let profiles = profiles_with(MockDatabase::new(DatabaseBackend::Postgres));
        let manager = SessionManager::new(
            Arc::new(StubProvider {
                identity: None,
                sign_out_fails: false,
            }),
            profiles,
        );

        let snapshot = manager.snapshot().await;
        assert!(snapshot.loading);
        assert!(snapshot.identity.is_none());
    }

    #[tokio::test]
    async fn test_init_without_session_is_signed_out() {
        let profiles = profiles_with(MockDatabase::new(DatabaseBackend::Postgres));
        let manager = SessionManager::new(
            Arc::new(StubProvider {
                identity: None,
                sign_out_fails: false,
            }),
            profiles,
        );

        manager.init().await.unwrap();

        let snapshot = manager.snapshot().await;
        assert!(!snapshot.loading);
        assert!(snapshot.identity.is_none());
        assert!(snapshot.profile.is_none());
    }

    #[tokio::test]
    async fn test_init_adopts_existing_profile() {
        let profiles = profiles_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_profile("u1")]]),
        );
        let manager = SessionManager::new(
            Arc::new(StubProvider {
                identity: Some(test_identity()),
                sign_out_fails: false,
            }),
            profiles,
        );

        manager.init().await.unwrap();

        let snapshot = manager.snapshot().await;
        assert!(!snapshot.loading);
        assert_eq!(snapshot.identity.unwrap().id, "u1");
        assert_eq!(snapshot.profile.unwrap().user_id, "u1");
    }

    #[tokio::test]
    async fn test_init_provisions_missing_profile() {
        // First query: profile lookup by id (empty). Second: username
        // collision check (empty). Third: the inserted row.
        let profiles = profiles_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profile::Model>::new()])
                .append_query_results([Vec::<profile::Model>::new()])
                .append_query_results([[test_profile("u1")]]),
        );
        let manager = SessionManager::new(
            Arc::new(StubProvider {
                identity: Some(test_identity()),
                sign_out_fails: false,
            }),
            profiles,
        );

        manager.init().await.unwrap();

        let snapshot = manager.snapshot().await;
        assert!(snapshot.profile.is_some());
    }

    #[tokio::test]
    async fn test_logout_clears_state_even_when_provider_fails() {
        let profiles = profiles_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_profile("u1")]]),
        );
        let manager = SessionManager::new(
            Arc::new(StubProvider {
                identity: Some(test_identity()),
                sign_out_fails: true,
            }),
            profiles,
        );

        manager.init().await.unwrap();
        manager.logout().await;

        let snapshot = manager.snapshot().await;
        assert!(snapshot.identity.is_none());
        assert!(snapshot.profile.is_none());
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_signed_out_event_clears_state() {
        let profiles = profiles_with(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_profile("u1")]]),
        );
        let manager = SessionManager::new(
            Arc::new(StubProvider {
                identity: Some(test_identity()),
                sign_out_fails: false,
            }),
            profiles,
        );

        manager.init().await.unwrap();
        manager.handle_auth_event(AuthEvent::SignedOut).await;

        let snapshot = manager.snapshot().await;
        assert!(snapshot.identity.is_none());
        assert!(snapshot.profile.is_none());
    }
}
