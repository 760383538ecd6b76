//! Friendship repository (directed edges).

use std::sync::Arc;

use crate::entities::{Friendship, friendship};
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, sea_query::OnConflict,
};

/// Friendship repository for database operations.
#[derive(Clone)]
pub struct FriendshipRepository {
    db: Arc<DatabaseConnection>,
}

impl FriendshipRepository {
    /// Create a new friendship repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert an edge unless it already exists. Returns whether a row was written.
    pub async fn create(&self, model: friendship::ActiveModel) -> AppResult<bool> {
        let rows = Friendship::insert(model)
            .on_conflict(
                OnConflict::columns([friendship::Column::UserId, friendship::Column::FriendId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(rows > 0)
    }

    /// Delete the edge `user_id -> friend_id`. Returns whether a row was removed.
    pub async fn delete_edge(&self, user_id: &str, friend_id: &str) -> AppResult<bool> {
        let result = Friendship::delete_many()
            .filter(friendship::Column::UserId.eq(user_id))
            .filter(friendship::Column::FriendId.eq(friend_id))
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// IDs of the users `user_id` has added as friends.
    pub async fn friend_ids(&self, user_id: &str) -> AppResult<Vec<String>> {
        let edges = Friendship::find()
            .filter(friendship::Column::UserId.eq(user_id))
            .order_by_asc(friendship::Column::FriendId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(edges.into_iter().map(|e| e.friend_id).collect())
    }
}
