//! Director repository.

use std::sync::Arc;

use crate::entities::{Director, director};
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Director repository for database operations.
#[derive(Clone)]
pub struct DirectorRepository {
    db: Arc<DatabaseConnection>,
}

impl DirectorRepository {
    /// Create a new director repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a director by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<director::Model>> {
        Director::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a director by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: i32) -> AppResult<director::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Director {id}")))
    }

    /// Find directors by IDs, ordered by ID.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<director::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Director::find()
            .filter(director::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(director::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all directors ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<director::Model>> {
        Director::find()
            .order_by_asc(director::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new director.
    pub async fn create(&self, model: director::ActiveModel) -> AppResult<director::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update a director.
    pub async fn update(&self, model: director::ActiveModel) -> AppResult<director::Model> {
        model
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a director (film credits cascade). Returns whether a row was removed.
    pub async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = Director::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<director::Model>::new()])
                .into_connection(),
        );

        let repo = DirectorRepository::new(db);
        let result = repo.get_by_id(7).await;

        assert!(matches!(result, Err(AppError::NotFound(msg)) if msg == "Director 7"));
    }
}
