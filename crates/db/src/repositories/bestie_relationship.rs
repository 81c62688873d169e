//! Bestie relationship repository.

use std::sync::Arc;

use crate::entities::{
    BestieRelationship,
    bestie_relationship::{self, BestieStatus},
};
use love8_common::{AppError, AppResult};
use sea_orm::{
    ActiveEnum, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder,
};

/// Bestie relationship repository for database operations.
#[derive(Clone)]
pub struct BestieRelationshipRepository {
    db: Arc<DatabaseConnection>,
}

impl BestieRelationshipRepository {
    /// Create a new bestie relationship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a relationship by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<bestie_relationship::Model>> {
        BestieRelationship::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a relationship by ID, or fail with `NotFound`.
    pub async fn get_by_id(&self, id: &str) -> AppResult<bestie_relationship::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Bestie relationship {id} not found")))
    }

    /// Create a new relationship.
    pub async fn create(
        &self,
        model: bestie_relationship::ActiveModel,
    ) -> AppResult<bestie_relationship::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a relationship.
    pub async fn update(
        &self,
        model: bestie_relationship::ActiveModel,
    ) -> AppResult<bestie_relationship::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find the accepted relationship a user belongs to, matching either
    /// direction of the pair.
    pub async fn find_accepted_for_user(
        &self,
        user_id: &str,
    ) -> AppResult<Option<bestie_relationship::Model>> {
        BestieRelationship::find()
            .filter(
                Condition::any()
                    .add(bestie_relationship::Column::RequesterId.eq(user_id))
                    .add(bestie_relationship::Column::RecipientId.eq(user_id)),
            )
            .filter(bestie_relationship::Column::Status.eq(BestieStatus::Accepted))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find any relationship between two users, in either direction.
    pub async fn find_pair(
        &self,
        a: &str,
        b: &str,
    ) -> AppResult<Option<bestie_relationship::Model>> {
        BestieRelationship::find()
            .filter(
                Condition::any()
                    .add(
                        Condition::all()
                            .add(bestie_relationship::Column::RequesterId.eq(a))
                            .add(bestie_relationship::Column::RecipientId.eq(b)),
                    )
                    .add(
                        Condition::all()
                            .add(bestie_relationship::Column::RequesterId.eq(b))
                            .add(bestie_relationship::Column::RecipientId.eq(a)),
                    ),
            )
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Pending requests addressed to a user, newest first.
    pub async fn find_pending_for_recipient(
        &self,
        recipient_id: &str,
    ) -> AppResult<Vec<bestie_relationship::Model>> {
        BestieRelationship::find()
            .filter(bestie_relationship::Column::RecipientId.eq(recipient_id))
            .filter(bestie_relationship::Column::Status.eq(BestieStatus::Pending))
            .order_by_desc(bestie_relationship::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Transition a pending request to accepted. Returns `false` when
    /// the request was not pending anymore.
    pub async fn accept_pending(&self, id: &str) -> AppResult<bool> {
        let result = BestieRelationship::update_many()
            .col_expr(
                bestie_relationship::Column::Status,
                BestieStatus::Accepted.as_enum(),
            )
            .filter(bestie_relationship::Column::Id.eq(id))
            .filter(bestie_relationship::Column::Status.eq(BestieStatus::Pending))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}
