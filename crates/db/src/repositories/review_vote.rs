//! Review vote repository.

use crate::entities::{ReviewVote, review_vote};
use filmrate_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, sea_query::OnConflict};

/// Review vote repository for database operations.
///
/// Votes only change together with the review's usefulness counter, so every
/// operation runs on the caller's transaction.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReviewVoteRepository;

impl ReviewVoteRepository {
    /// Create a new review vote repository.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find a user's vote on a review.
    pub async fn find_by_review_and_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: &str,
        user_id: &str,
    ) -> AppResult<Option<review_vote::Model>> {
        ReviewVote::find()
            .filter(review_vote::Column::ReviewId.eq(review_id))
            .filter(review_vote::Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Record a vote, replacing the kind of any existing vote by the same user.
    pub async fn put<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: review_vote::ActiveModel,
    ) -> AppResult<()> {
        ReviewVote::insert(model)
            .on_conflict(
                OnConflict::columns([review_vote::Column::ReviewId, review_vote::Column::UserId])
                    .update_column(review_vote::Column::Kind)
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Remove a user's vote on a review. Returns whether a row was removed.
    pub async fn delete_by_review_and_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        review_id: &str,
        user_id: &str,
    ) -> AppResult<bool> {
        let result = ReviewVote::delete_many()
            .filter(review_vote::Column::ReviewId.eq(review_id))
            .filter(review_vote::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::review_vote::VoteKind;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_find_by_review_and_user() {
        let vote = review_vote::Model {
            id: "v1".to_string(),
            review_id: "r1".to_string(),
            user_id: "u1".to_string(),
            kind: VoteKind::Dislike,
            created_at: Utc::now().into(),
        };

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[vote]])
                .into_connection(),
        );

        let repo = ReviewVoteRepository::new();
        let found = repo
            .find_by_review_and_user(db.as_ref(), "r1", "u1")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(found.kind, VoteKind::Dislike);
    }
}
