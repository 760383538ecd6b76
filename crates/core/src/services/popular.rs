//! Popularity ranker.

use filmrate_common::{AppError, AppResult};
use filmrate_db::{entities::film, repositories::FilmRepository};
use serde::Deserialize;

/// Filters for the popular-films listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularQuery {
    /// Maximum number of films; all films when absent.
    pub count: Option<u64>,
    /// Only films tagged with this genre.
    pub genre_id: Option<i32>,
    /// Only films released in this calendar year.
    pub year: Option<i32>,
}

/// Service ranking the catalog by score.
#[derive(Clone)]
pub struct PopularityRanker {
    film_repo: FilmRepository,
}

impl PopularityRanker {
    /// Create a new popularity ranker.
    #[must_use]
    pub const fn new(film_repo: FilmRepository) -> Self {
        Self { film_repo }
    }

    /// Films ordered by score, filtered by genre and release year.
    ///
    /// An unknown genre simply matches nothing.
    pub async fn popular(&self, query: &PopularQuery) -> AppResult<Vec<film::Model>> {
        if query.count == Some(0) {
            return Err(AppError::Validation(
                "count must be a positive number".to_string(),
            ));
        }

        let films = self
            .film_repo
            .find_popular(query.count, query.genre_id, query.year)
            .await?;

        tracing::debug!(
            count = ?query.count,
            genre_id = ?query.genre_id,
            year = ?query.year,
            returned = films.len(),
            "Popular films listed"
        );

        Ok(films)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};
    use std::sync::Arc;

    fn test_film(id: &str, score: f64) -> film::Model {
        film::Model {
            id: id.to_string(),
            name: format!("Film {id}"),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            duration: 90,
            mpa_id: 1,
            score,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_popular_orders_by_score_then_id_in_sql() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_film("f1", 9.0), test_film("f2", 7.0)]])
                .into_connection(),
        );
        let ranker = PopularityRanker::new(FilmRepository::new(Arc::clone(&db)));

        ranker
            .popular(&PopularQuery {
                count: Some(3),
                genre_id: Some(2),
                year: Some(2001),
            })
            .await
            .unwrap();
        drop(ranker);

        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        assert_eq!(
            log,
            vec![Transaction::from_sql_and_values(
                DatabaseBackend::Postgres,
                concat!(
                    r#"SELECT "film"."id", "film"."name", "film"."description", "#,
                    r#""film"."release_date", "film"."duration", "film"."mpa_id", "#,
                    r#""film"."score", "film"."created_at" FROM "film" "#,
                    r#"WHERE "film"."id" IN (SELECT "film_id" FROM "film_genre" "#,
                    r#"WHERE "film_genre"."genre_id" = $1) "#,
                    r#"AND "film"."release_date" BETWEEN $2 AND $3 "#,
                    r#"ORDER BY "film"."score" DESC, "film"."id" ASC LIMIT $4"#,
                ),
                [
                    2i32.into(),
                    NaiveDate::from_ymd_opt(2001, 1, 1).unwrap().into(),
                    NaiveDate::from_ymd_opt(2001, 12, 31).unwrap().into(),
                    3u64.into(),
                ],
            )]
        );
    }

    #[tokio::test]
    async fn test_popular_comedy_top_one() {
        // Catalog {F1 score 9 Drama, F2 score 7 Comedy}: the genre filter runs in SQL.
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_film("f2", 7.0)]])
                .into_connection(),
        );
        let ranker = PopularityRanker::new(FilmRepository::new(db));

        let films = ranker
            .popular(&PopularQuery {
                count: Some(1),
                genre_id: Some(1),
                year: None,
            })
            .await
            .unwrap();

        assert_eq!(films.len(), 1);
        assert_eq!(films[0].id, "f2");
    }

    #[tokio::test]
    async fn test_popular_zero_count_is_rejected_before_query() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let ranker = PopularityRanker::new(FilmRepository::new(db));

        let result = ranker
            .popular(&PopularQuery {
                count: Some(0),
                ..PopularQuery::default()
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
