//! Trait repository.

use std::sync::Arc;

use crate::entities::{Profile, Trait, profile, traits};
use love8_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Trait repository for database operations.
#[derive(Clone)]
pub struct TraitRepository {
    db: Arc<DatabaseConnection>,
}

impl TraitRepository {
    /// Create a new trait repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a trait by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<traits::Model>> {
        Trait::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a trait by ID, or fail with `TraitNotFound`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<traits::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::TraitNotFound(id.to_string()))
    }

    /// Create a new trait.
    pub async fn create(&self, model: traits::ActiveModel) -> AppResult<traits::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a user's approved traits, most endorsed first.
    pub async fn find_approved_by_user(&self, user_id: &str) -> AppResult<Vec<traits::Model>> {
        Trait::find()
            .filter(traits::Column::UserId.eq(user_id))
            .filter(traits::Column::IsApproved.eq(true))
            .order_by_desc(traits::Column::EndorsementCount)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get all approved traits joined with their owner's profile,
    /// newest first. This backs the public feed.
    pub async fn find_all_approved(
        &self,
        limit: u64,
    ) -> AppResult<Vec<(traits::Model, Option<profile::Model>)>> {
        Trait::find()
            .filter(traits::Column::IsApproved.eq(true))
            .order_by_desc(traits::Column::CreatedAt)
            .limit(limit)
            .find_also_related(Profile)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count a user's traits (approved or not).
    pub async fn count_by_user(&self, user_id: &str) -> AppResult<u64> {
        Trait::find()
            .filter(traits::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Increment the endorsement count atomically and touch `updated_at`
    /// (single UPDATE query, no fetch).
    pub async fn increment_endorsement_count(&self, id: &str) -> AppResult<()> {
        Trait::update_many()
            .col_expr(
                traits::Column::EndorsementCount,
                Expr::col(traits::Column::EndorsementCount).add(1),
            )
            .col_expr(traits::Column::UpdatedAt, Expr::current_timestamp().into())
            .filter(traits::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::traits::ColorTheme;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_trait(id: &str, user_id: &str, word: &str, count: i32) -> traits::Model {
        traits::Model {
            id: id.to_string(),
            user_id: user_id.to_string(),
            word: word.to_string(),
            description: None,
            color_theme: ColorTheme::Blue,
            endorsement_count: count,
            is_approved: true,
            ai_suggested: false,
            created_at: Utc::now().into(),
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let trait_row = create_test_trait("t1", "u1", "Creative", 3);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[trait_row.clone()]])
                .into_connection(),
        );

        let repo = TraitRepository::new(db);
        let result = repo.find_by_id("t1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().word, "Creative");
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<traits::Model>::new()])
                .into_connection(),
        );

        let repo = TraitRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::TraitNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected TraitNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_find_approved_by_user() {
        let t1 = create_test_trait("t1", "u1", "Creative", 5);
        let t2 = create_test_trait("t2", "u1", "Kind", 2);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[t1, t2]])
                .into_connection(),
        );

        let repo = TraitRepository::new(db);
        let result = repo.find_approved_by_user("u1").await.unwrap();

        assert_eq!(result.len(), 2);
    }
}
