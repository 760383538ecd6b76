//! Rating repository.

use std::sync::Arc;

use crate::entities::{Rating, rating};
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    sea_query::OnConflict,
};

/// Rating repository for database operations.
#[derive(Clone)]
pub struct RatingRepository {
    db: Arc<DatabaseConnection>,
}

impl RatingRepository {
    /// Create a new rating repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Insert a rating, or replace the value of the existing (film, user) rating.
    pub async fn upsert<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: rating::ActiveModel,
    ) -> AppResult<()> {
        Rating::insert(model)
            .on_conflict(
                OnConflict::columns([rating::Column::FilmId, rating::Column::UserId])
                    .update_columns([rating::Column::Value, rating::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete the rating a user gave a film. Returns whether a row was removed.
    pub async fn delete_by_film_and_user<C: ConnectionTrait>(
        &self,
        conn: &C,
        film_id: &str,
        user_id: &str,
    ) -> AppResult<bool> {
        let result = Rating::delete_many()
            .filter(rating::Column::FilmId.eq(film_id))
            .filter(rating::Column::UserId.eq(user_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// All live rating values of a film.
    pub async fn values_for_film<C: ConnectionTrait>(
        &self,
        conn: &C,
        film_id: &str,
    ) -> AppResult<Vec<i32>> {
        let ratings = Rating::find()
            .filter(rating::Column::FilmId.eq(film_id))
            .all(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(ratings.into_iter().map(|r| r.value).collect())
    }

    /// Every rating a user has given.
    pub async fn find_by_user(&self, user_id: &str) -> AppResult<Vec<rating::Model>> {
        Rating::find()
            .filter(rating::Column::UserId.eq(user_id))
            .order_by_asc(rating::Column::FilmId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Ratings by users other than `user_id` on any of the given films.
    pub async fn find_co_ratings(
        &self,
        user_id: &str,
        film_ids: &[String],
    ) -> AppResult<Vec<rating::Model>> {
        if film_ids.is_empty() {
            return Ok(Vec::new());
        }

        Rating::find()
            .filter(rating::Column::FilmId.is_in(film_ids.iter().cloned()))
            .filter(rating::Column::UserId.ne(user_id))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every rating given by any of the listed users.
    pub async fn find_by_users(&self, user_ids: &[String]) -> AppResult<Vec<rating::Model>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        Rating::find()
            .filter(rating::Column::UserId.is_in(user_ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Every rating on any of the listed films.
    pub async fn find_by_films(&self, film_ids: &[String]) -> AppResult<Vec<rating::Model>> {
        if film_ids.is_empty() {
            return Ok(Vec::new());
        }

        Rating::find()
            .filter(rating::Column::FilmId.is_in(film_ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
