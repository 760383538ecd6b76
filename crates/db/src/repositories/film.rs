//! Film repository.

use std::sync::Arc;

use super::write_error;
use crate::entities::{Film, FilmDirector, FilmGenre, film, film_director, film_genre};
use chrono::NaiveDate;
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect,
    sea_query::{Expr, Query},
};

/// Ordering applied when listing films.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilmOrder {
    /// Oldest release first.
    ReleaseDateAsc,
    /// Highest score first.
    ScoreDesc,
}

const DUPLICATE_FILM: &str = "a film with this name and release date already exists";

/// Film repository for database operations.
#[derive(Clone)]
pub struct FilmRepository {
    db: Arc<DatabaseConnection>,
}

impl FilmRepository {
    /// Create a new film repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a film by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<film::Model>> {
        Film::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a film by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<film::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::FilmNotFound(id.to_string()))
    }

    /// Check whether a film exists.
    pub async fn exists(&self, id: &str) -> AppResult<bool> {
        Ok(self.find_by_id(id).await?.is_some())
    }

    /// Find films by IDs (order not guaranteed).
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<film::Model>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        Film::find()
            .filter(film::Column::Id.is_in(ids.iter().cloned()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// List every film in creation order.
    pub async fn find_all(&self) -> AppResult<Vec<film::Model>> {
        Film::find()
            .order_by_asc(film::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a film by its duplicate-detection key.
    pub async fn find_by_name_and_release_date(
        &self,
        name: &str,
        release_date: NaiveDate,
    ) -> AppResult<Option<film::Model>> {
        Film::find()
            .filter(film::Column::Name.eq(name))
            .filter(film::Column::ReleaseDate.eq(release_date))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Films ordered by score descending (id ascending on ties), optionally
    /// restricted to a genre and a release year.
    pub async fn find_popular(
        &self,
        limit: Option<u64>,
        genre_id: Option<i32>,
        year: Option<i32>,
    ) -> AppResult<Vec<film::Model>> {
        let mut query = Film::find()
            .order_by_desc(film::Column::Score)
            .order_by_asc(film::Column::Id);

        if let Some(genre_id) = genre_id {
            query = query.filter(
                film::Column::Id.in_subquery(
                    Query::select()
                        .column(film_genre::Column::FilmId)
                        .from(FilmGenre)
                        .and_where(film_genre::Column::GenreId.eq(genre_id))
                        .to_owned(),
                ),
            );
        }

        if let Some(year) = year {
            let (Some(start), Some(end)) = (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ) else {
                return Ok(Vec::new());
            };
            query = query.filter(film::Column::ReleaseDate.between(start, end));
        }

        if let Some(limit) = limit {
            query = query.limit(limit);
        }

        query
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Films credited to a director.
    pub async fn find_by_director(
        &self,
        director_id: i32,
        order: FilmOrder,
    ) -> AppResult<Vec<film::Model>> {
        let query = Film::find().filter(
            film::Column::Id.in_subquery(
                Query::select()
                    .column(film_director::Column::FilmId)
                    .from(FilmDirector)
                    .and_where(film_director::Column::DirectorId.eq(director_id))
                    .to_owned(),
            ),
        );

        let query = match order {
            FilmOrder::ReleaseDateAsc => query.order_by_asc(film::Column::ReleaseDate),
            FilmOrder::ScoreDesc => query.order_by_desc(film::Column::Score),
        };

        query
            .order_by_asc(film::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a film on the given connection.
    pub async fn create<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: film::ActiveModel,
    ) -> AppResult<film::Model> {
        model
            .insert(conn)
            .await
            .map_err(|e| write_error(&e, DUPLICATE_FILM))
    }

    /// Update a film on the given connection.
    pub async fn update<C: ConnectionTrait>(
        &self,
        conn: &C,
        model: film::ActiveModel,
    ) -> AppResult<film::Model> {
        model
            .update(conn)
            .await
            .map_err(|e| write_error(&e, DUPLICATE_FILM))
    }

    /// Delete a film (ratings, reviews and links cascade). Returns whether a row was removed.
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = Film::delete_by_id(id)
            .exec(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(result.rows_affected > 0)
    }

    /// Read a film row with `SELECT ... FOR UPDATE`, serializing writers of its score.
    pub async fn lock_by_id<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
    ) -> AppResult<Option<film::Model>> {
        Film::find_by_id(id)
            .lock_exclusive()
            .one(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Persist a recomputed score. Fails with a storage error if no row was touched.
    pub async fn update_score<C: ConnectionTrait>(
        &self,
        conn: &C,
        id: &str,
        score: f64,
    ) -> AppResult<()> {
        let result = Film::update_many()
            .col_expr(film::Column::Score, Expr::value(score))
            .filter(film::Column::Id.eq(id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.rows_affected == 0 {
            return Err(AppError::Storage(format!("score of film {id} was not updated")));
        }
        Ok(())
    }
}
