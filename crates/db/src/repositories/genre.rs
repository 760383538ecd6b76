//! Genre repository (read-only reference data).

use std::sync::Arc;

use crate::entities::{Genre, genre};
use filmrate_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

/// Genre repository for database operations.
#[derive(Clone)]
pub struct GenreRepository {
    db: Arc<DatabaseConnection>,
}

impl GenreRepository {
    /// Create a new genre repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a genre by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<genre::Model>> {
        Genre::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find genres by IDs, ordered by ID.
    pub async fn find_by_ids(&self, ids: &[i32]) -> AppResult<Vec<genre::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        Genre::find()
            .filter(genre::Column::Id.is_in(ids.to_vec()))
            .order_by_asc(genre::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all genres ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<genre::Model>> {
        Genre::find()
            .order_by_asc(genre::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
