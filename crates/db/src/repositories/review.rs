//! Review repository.

use std::sync::Arc;

use crate::entities::{Review, review};
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

/// Review repository for database operations.
#[derive(Clone)]
pub struct ReviewRepository {
    db: Arc<DatabaseConnection>,
}

impl ReviewRepository {
    /// Create a new review repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a review by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a review by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<review::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::ReviewNotFound(id.to_string()))
    }

    /// Reviews ordered by usefulness (most useful first), optionally for one film.
    pub async fn find_most_useful(
        &self,
        film_id: Option<&str>,
        limit: u64,
    ) -> AppResult<Vec<review::Model>> {
        let mut query = Review::find()
            .order_by_desc(review::Column::Useful)
            .order_by_asc(review::Column::Id);

        if let Some(film_id) = film_id {
            query = query.filter(review::Column::FilmId.eq(film_id));
        }

        query
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new review.
    pub async fn create(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a review.
    pub async fn update(&self, model: review::ActiveModel) -> AppResult<review::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a review (votes cascade). Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Review::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Read a review row with `SELECT ... FOR UPDATE`, serializing voters on it.
    pub async fn lock_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<review::Model>> {
        Review::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Add `delta` to the usefulness counter. Fails with a storage error if no row was touched.
    pub async fn adjust_useful<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        delta: i32,
    ) -> AppResult<()> {
        let result = Review::update_many()
            .col_expr(
                review::Column::Useful,
                Expr::col(review::Column::Useful).add(delta),
            )
            .filter(review::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::Storage(format!(
                "usefulness of review {id} was not updated"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn create_test_review(id: &str, film_id: &str, useful: i32) -> review::Model {
        review::Model {
            id: id.to_string(),
            content: "Worth a watch".to_string(),
            is_positive: true,
            user_id: "u1".to_string(),
            film_id: film_id.to_string(),
            useful,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_get_by_id_found() {
        let review = create_test_review("r1", "f1", 3);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[review]])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let found = repo.get_by_id("r1").await.unwrap();

        assert_eq!(found.useful, 3);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let repo = ReviewRepository::new(db);
        let result = repo.get_by_id("nope").await;

        assert!(matches!(result, Err(AppError::ReviewNotFound(_))));
    }

    #[tokio::test]
    async fn test_adjust_useful_zero_rows_is_storage_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                }])
                .into_connection(),
        );

        let repo = ReviewRepository::new(Arc::clone(&db));
        let result = repo.adjust_useful(db.as_ref(), "r1", 2).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
