//! Profile service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use love8_common::{AppError, AppResult, IdGenerator, generate_username};
use love8_db::{entities::profile, repositories::ProfileRepository};
use sea_orm::Set;
use serde::Deserialize;
use validator::Validate;

/// Profile service for business logic.
#[derive(Clone)]
pub struct ProfileService {
    profile_repo: ProfileRepository,
    id_gen: IdGenerator,
}

/// Input for creating a new account.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupInput {
    #[validate(length(min = 1, max = 128))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,

    #[validate(length(max = 256))]
    pub display_name: Option<String>,
}

/// Input for updating a profile.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileInput {
    #[validate(length(max = 256))]
    pub display_name: Option<String>,

    #[validate(length(max = 2048))]
    pub bio: Option<String>,

    #[validate(length(max = 512))]
    pub avatar_url: Option<String>,

    /// Social links (platform -> URL)
    pub social_links: Option<serde_json::Value>,
}

impl ProfileService {
    /// Create a new profile service.
    #[must_use]
    pub const fn new(profile_repo: ProfileRepository) -> Self {
        Self {
            profile_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Create a new account with a password.
    pub async fn signup(&self, input: SignupInput) -> AppResult<profile::Model> {
        input.validate()?;

        // Check if username is taken
        if self
            .profile_repo
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(AppError::BadRequest("Username already taken".to_string()));
        }

        let password_hash = hash_password(&input.password)?;
        let user_id = self.id_gen.generate();
        let token = self.id_gen.generate_token();

        let model = profile::ActiveModel {
            user_id: Set(user_id),
            username: Set(input.username.clone()),
            username_lower: Set(input.username.to_lowercase()),
            display_name: Set(input.display_name),
            avatar_url: Set(None),
            bio: Set(None),
            social_links: Set(serde_json::json!({})),
            endorsement_count: Set(0),
            password: Set(Some(password_hash)),
            token: Set(Some(token)),
            created_at: Set(chrono::Utc::now().into()),
            updated_at: Set(None),
        };

        self.profile_repo.create(model).await
    }

    /// Synthesize and persist a default profile for a first-time identity.
    ///
    /// The username is derived from the display name or email with a
    /// random suffix; on a collision one more suffix is tried before
    /// giving up with `Conflict`.
    pub async fn provision(
        &self,
        user_id: &str,
        display_name: Option<&str>,
        email: Option<&str>,
        avatar_url: Option<&str>,
    ) -> AppResult<profile::Model> {
        for attempt in 0..2 {
            let username = generate_username(display_name, email);

            if self
                .profile_repo
                .find_by_username(&username)
                .await?
                .is_some()
            {
                tracing::debug!(username = %username, attempt, "Derived username taken, retrying");
                continue;
            }

            let model = profile::ActiveModel {
                user_id: Set(user_id.to_string()),
                username: Set(username.clone()),
                username_lower: Set(username.to_lowercase()),
                display_name: Set(display_name.map(str::to_string)),
                avatar_url: Set(avatar_url.map(str::to_string)),
                bio: Set(Some(String::new())),
                social_links: Set(serde_json::json!({})),
                endorsement_count: Set(0),
                password: Set(None),
                token: Set(Some(self.id_gen.generate_token())),
                created_at: Set(chrono::Utc::now().into()),
                updated_at: Set(None),
            };

            return self.profile_repo.create(model).await;
        }

        Err(AppError::Conflict(
            "Could not derive a free username".to_string(),
        ))
    }

    /// Get a profile by user ID.
    pub async fn get(&self, user_id: &str) -> AppResult<profile::Model> {
        self.profile_repo.get_by_user_id(user_id).await
    }

    /// Look up a profile by user ID, returning `None` when absent.
    pub async fn find(&self, user_id: &str) -> AppResult<Option<profile::Model>> {
        self.profile_repo.find_by_user_id(user_id).await
    }

    /// Get a profile by username.
    pub async fn get_by_username(&self, username: &str) -> AppResult<profile::Model> {
        self.profile_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::ProfileNotFound(username.to_string()))
    }

    /// Authenticate by username and password.
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<profile::Model> {
        let profile = self
            .profile_repo
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let password_hash = profile.password.clone().ok_or(AppError::Unauthorized)?;
        if !verify_password(password, &password_hash)? {
            return Err(AppError::Unauthorized);
        }

        Ok(profile)
    }

    /// Authenticate by access token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<profile::Model> {
        self.profile_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Regenerate a profile's access token, invalidating the current one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: profile::ActiveModel = profile.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.profile_repo.update(active).await?;

        Ok(new_token)
    }

    /// Update a profile.
    pub async fn update(
        &self,
        user_id: &str,
        input: UpdateProfileInput,
    ) -> AppResult<profile::Model> {
        input.validate()?;

        let profile = self.profile_repo.get_by_user_id(user_id).await?;
        let mut active: profile::ActiveModel = profile.into();

        if let Some(display_name) = input.display_name {
            active.display_name = Set(Some(display_name));
        }
        if let Some(bio) = input.bio {
            active.bio = Set(Some(bio));
        }
        if let Some(avatar_url) = input.avatar_url {
            active.avatar_url = Set(Some(avatar_url));
        }
        if let Some(social_links) = input.social_links {
            active.social_links = Set(social_links);
        }

        active.updated_at = Set(Some(chrono::Utc::now().into()));

        self.profile_repo.update(active).await
    }
}

/// Hash a password with Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Internal(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    fn create_test_profile(user_id: &str, username: &str) -> profile::Model {
        profile::Model {
            user_id: user_id.to_string(),
            username: username.to_string(),
            username_lower: username.to_lowercase(),
            display_name: None,
            avatar_url: None,
            bio: None,
            social_links: serde_json::json!({}),
            endorsement_count: 0,
            password: None,
            token: Some("token".to_string()),
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("hunter2hunter2").unwrap();
        assert!(verify_password("hunter2hunter2", &hash).unwrap());
        assert!(!verify_password("wrong-password", &hash).unwrap());
    }

    #[test]
    fn test_signup_input_rejects_short_password() {
        let input = SignupInput {
            username: "ada".to_string(),
            password: "short".to_string(),
            display_name: None,
        };
        assert!(input.validate().is_err());
    }

    #[tokio::test]
    async fn test_signup_username_taken() {
        let existing = create_test_profile("u1", "ada42");

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[existing]])
                .into_connection(),
        );

        let service = ProfileService::new(ProfileRepository::new(db));
        let result = service
            .signup(SignupInput {
                username: "ada42".to_string(),
                password: "hunter2hunter2".to_string(),
                display_name: None,
            })
            .await;

        match result {
            Err(AppError::BadRequest(msg)) => assert!(msg.contains("taken")),
            _ => panic!("Expected BadRequest error"),
        }
    }

    #[tokio::test]
    async fn test_authenticate_unknown_username() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profile::Model>::new()])
                .into_connection(),
        );

        let service = ProfileService::new(ProfileRepository::new(db));
        let result = service.authenticate("ghost", "irrelevant").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_by_token_invalid() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<profile::Model>::new()])
                .into_connection(),
        );

        let service = ProfileService::new(ProfileRepository::new(db));
        let result = service.authenticate_by_token("bogus").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
