//! Film-genre link repository.

use std::sync::Arc;

use crate::entities::{FilmGenre, film_genre};
use filmrate_common::{AppError, AppResult};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

/// Film-genre link repository for database operations.
#[derive(Clone)]
pub struct FilmGenreRepository {
    db: Arc<DatabaseConnection>,
}

impl FilmGenreRepository {
    /// Create a new film-genre repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Genre links of the given films, in display order per film.
    pub async fn find_by_films(&self, film_ids: &[String]) -> AppResult<Vec<film_genre::Model>> {
        if film_ids.is_empty() {
            return Ok(vec![]);
        }

        FilmGenre::find()
            .filter(film_genre::Column::FilmId.is_in(film_ids.to_vec()))
            .order_by_asc(film_genre::Column::FilmId)
            .order_by_asc(film_genre::Column::Position)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Replace a film's genres. `links` pairs a fresh link ID with each genre ID,
    /// in display order.
    pub async fn replace_for_film<C: ConnectionTrait>(
        &self,
        conn: &C,
        film_id: &str,
        links: Vec<(String, i32)>,
    ) -> AppResult<()> {
        FilmGenre::delete_many()
            .filter(film_genre::Column::FilmId.eq(film_id))
            .exec(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if links.is_empty() {
            return Ok(());
        }

        let models = links
            .into_iter()
            .zip(0..)
            .map(|((id, genre_id), position)| film_genre::ActiveModel {
                id: Set(id),
                film_id: Set(film_id.to_string()),
                genre_id: Set(genre_id),
                position: Set(position),
            });

        FilmGenre::insert_many(models)
            .exec_without_returning(conn)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
