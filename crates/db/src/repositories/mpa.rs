//! MPA rating repository (read-only reference data).

use std::sync::Arc;

use crate::entities::{Mpa, mpa};
use filmrate_common::{AppError, AppResult};
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder};

/// MPA rating repository for database operations.
#[derive(Clone)]
pub struct MpaRepository {
    db: Arc<DatabaseConnection>,
}

impl MpaRepository {
    /// Create a new MPA repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find an MPA rating by ID.
    pub async fn find_by_id(&self, id: i32) -> AppResult<Option<mpa::Model>> {
        Mpa::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List all MPA ratings ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<mpa::Model>> {
        Mpa::find()
            .order_by_asc(mpa::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
