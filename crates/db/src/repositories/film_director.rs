//! Film-director link repository.

use std::sync::Arc;

use crate::entities::{FilmDirector, film_director};
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Film-director link repository for database operations.
#[derive(Clone)]
pub struct FilmDirectorRepository {
    db: Arc<DatabaseConnection>,
}

impl FilmDirectorRepository {
    /// Create a new film-director repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Director links of the given films.
    pub async fn find_by_films(
        &self,
        film_ids: &[String],
    ) -> AppResult<Vec<film_director::Model>> {
        if film_ids.is_empty() {
            return Ok(vec![]);
        }

        FilmDirector::find()
            .filter(film_director::Column::FilmId.is_in(film_ids.to_vec()))
            .order_by_asc(film_director::Column::FilmId)
            .order_by_asc(film_director::Column::DirectorId)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace a film's directors. `links` pairs a fresh link ID with each director ID.
    pub async fn replace_for_film<C: ConnectionTrait>(
        &self,
        conn: &C,
        film_id: &str,
        links: Vec<(String, i32)>,
    ) -> AppResult<()> {
        FilmDirector::delete_many()
            .filter(film_director::Column::FilmId.eq(film_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if links.is_empty() {
            return Ok(());
        }

        let models = links
            .into_iter()
            .map(|(id, director_id)| film_director::ActiveModel {
                id: Set(id),
                film_id: Set(film_id.to_string()),
                director_id: Set(director_id),
            });

        FilmDirector::insert_many(models)
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
