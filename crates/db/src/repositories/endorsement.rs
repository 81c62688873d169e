//! Endorsement repository.

use std::sync::Arc;

use crate::entities::{
    Endorsement, Trait,
    endorsement::{self, EndorsementStatus},
    traits,
};
use love8_common::{AppError, AppResult};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder,
};

/// Endorsement repository for database operations.
#[derive(Clone)]
pub struct EndorsementRepository {
    db: Arc<DatabaseConnection>,
}

impl EndorsementRepository {
    /// Create a new endorsement repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an endorsement by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<endorsement::Model>> {
        Endorsement::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get an endorsement by ID, or fail with `EndorsementNotFound`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<endorsement::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::EndorsementNotFound(id.to_string()))
    }

    /// Create a new endorsement.
    pub async fn create(&self, model: endorsement::ActiveModel) -> AppResult<endorsement::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Check whether an endorser already endorsed a trait.
    ///
    /// Any row counts, including declined ones; the unique
    /// (`trait_id`, `endorser_id`) key is the authoritative guard.
    pub async fn exists_for_pair(&self, trait_id: &str, endorser_id: &str) -> AppResult<bool> {
        let found = Endorsement::find()
            .filter(endorsement::Column::TraitId.eq(trait_id))
            .filter(endorsement::Column::EndorserId.eq(endorser_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(found.is_some())
    }

    /// Get a recipient's pending endorsements joined with the endorsed
    /// trait, newest first.
    pub async fn find_pending_by_recipient(
        &self,
        recipient_id: &str,
    ) -> AppResult<Vec<(endorsement::Model, Option<traits::Model>)>> {
        Endorsement::find()
            .filter(endorsement::Column::RecipientId.eq(recipient_id))
            .filter(endorsement::Column::Status.eq(EndorsementStatus::Pending))
            .order_by_desc(endorsement::Column::CreatedAt)
            .find_also_related(Trait)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Transition a pending endorsement to approved.
    ///
    /// Conditional single-statement update: returns `false` when the
    /// endorsement was not pending anymore, making approval idempotent
    /// under concurrent submissions.
    pub async fn approve_pending(&self, id: &str) -> AppResult<bool> {
        let result = Endorsement::update_many()
            .col_expr(
                endorsement::Column::Status,
                EndorsementStatus::Approved.as_enum(),
            )
            .filter(endorsement::Column::Id.eq(id))
            .filter(endorsement::Column::Status.eq(EndorsementStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Transition a pending endorsement to declined.
    ///
    /// The row is kept (not deleted) so the duplicate guard stays
    /// meaningful for declined endorsers.
    pub async fn decline_pending(&self, id: &str) -> AppResult<bool> {
        let result = Endorsement::update_many()
            .col_expr(
                endorsement::Column::Status,
                EndorsementStatus::Declined.as_enum(),
            )
            .filter(endorsement::Column::Id.eq(id))
            .filter(endorsement::Column::Status.eq(EndorsementStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Count approved endorsements received by a user.
    pub async fn count_approved_by_recipient(&self, recipient_id: &str) -> AppResult<u64> {
        Endorsement::find()
            .filter(endorsement::Column::RecipientId.eq(recipient_id))
            .filter(endorsement::Column::Status.eq(EndorsementStatus::Approved))
            .count(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_endorsement(id: &str, status: EndorsementStatus) -> endorsement::Model {
        endorsement::Model {
            id: id.to_string(),
            trait_id: "t1".to_string(),
            endorser_id: "u2".to_string(),
            recipient_id: "u1".to_string(),
            message: Some("So true".to_string()),
            status,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let endorsement = create_test_endorsement("e1", EndorsementStatus::Pending);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[endorsement.clone()]])
                .into_connection(),
        );

        let repo = EndorsementRepository::new(db);
        let result = repo.find_by_id("e1").await.unwrap();

        assert!(result.is_some());
        assert_eq!(result.unwrap().status, EndorsementStatus::Pending);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<endorsement::Model>::new()])
                .into_connection(),
        );

        let repo = EndorsementRepository::new(db);
        let result = repo.get_by_id("nonexistent").await;

        match result {
            Err(AppError::EndorsementNotFound(id)) => assert_eq!(id, "nonexistent"),
            _ => panic!("Expected EndorsementNotFound error"),
        }
    }

    #[tokio::test]
    async fn test_exists_for_pair_true() {
        let endorsement = create_test_endorsement("e1", EndorsementStatus::Declined);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[endorsement]])
                .into_connection(),
        );

        let repo = EndorsementRepository::new(db);
        assert!(repo.exists_for_pair("t1", "u2").await.unwrap());
    }

    #[tokio::test]
    async fn test_approve_pending_reports_transition() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );

        let repo = EndorsementRepository::new(db);
        assert!(repo.approve_pending("e1").await.unwrap());
    }

    #[tokio::test]
    async fn test_approve_pending_noop_when_already_resolved() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = EndorsementRepository::new(db);
        assert!(!repo.approve_pending("e1").await.unwrap());
    }
}
