//! Event repository (append-only).

use std::sync::Arc;

use crate::entities::{Event, event};
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Event repository for database operations.
#[derive(Clone)]
pub struct EventRepository {
    db: Arc<DatabaseConnection>,
}

impl EventRepository {
    /// Create a new event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Append an event.
    pub async fn create(&self, model: event::ActiveModel) -> AppResult<event::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// A user's events in append order.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<event::Model>> {
        Event::find()
            .filter(event::Column::UserId.eq(user_id))
            .order_by_asc(event::Column::Timestamp)
            .order_by_asc(event::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
