//! Rating aggregator.
//!
//! Owns the per-film `score`: every rating mutation and the recomputation of
//! the film's mean run in one transaction that holds the film row lock, so
//! concurrent raters of the same film cannot lose each other's update.

use std::sync::Arc;

use chrono::Utc;
use filmrate_common::{AppError, AppResult, IdGenerator, config::RatingConfig};
use filmrate_db::{
    entities::{
        event::{EventType, Operation},
        rating,
    },
    repositories::{FilmRepository, RatingRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

use crate::services::event_ledger::{EventLedgerService, NewEvent, record};

/// Mean of the live ratings rounded to one decimal place, `0.0` without ratings.
#[must_use]
pub fn aggregate_score(values: &[i32]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }

    let sum: i64 = values.iter().map(|&v| i64::from(v)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = sum as f64 / values.len() as f64;
    (mean * 10.0).round() / 10.0
}

/// Inclusive range a single rating value must fall in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingBounds {
    /// Lowest accepted value.
    pub min: i32,
    /// Highest accepted value.
    pub max: i32,
}

impl RatingBounds {
    /// Reject values outside the bounds.
    pub fn check(&self, value: i32) -> AppResult<()> {
        if value < self.min || value > self.max {
            return Err(AppError::Validation(format!(
                "rating must be between {} and {}, got {value}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl Default for RatingBounds {
    fn default() -> Self {
        Self::from(&RatingConfig::default())
    }
}

impl From<&RatingConfig> for RatingBounds {
    fn from(config: &RatingConfig) -> Self {
        Self {
            min: config.min,
            max: config.max,
        }
    }
}

/// Service maintaining film scores from individual user ratings.
#[derive(Clone)]
pub struct RatingAggregator {
    db: Arc<DatabaseConnection>,
    film_repo: FilmRepository,
    user_repo: UserRepository,
    rating_repo: RatingRepository,
    events: EventLedgerService,
    bounds: RatingBounds,
    id_gen: IdGenerator,
}

impl RatingAggregator {
    /// Create a new rating aggregator.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        film_repo: FilmRepository,
        user_repo: UserRepository,
        rating_repo: RatingRepository,
        events: EventLedgerService,
        bounds: RatingBounds,
    ) -> Self {
        Self {
            db,
            film_repo,
            user_repo,
            rating_repo,
            events,
            bounds,
            id_gen: IdGenerator::new(),
        }
    }

    /// Rate a film (or replace the user's previous rating). Returns the new score.
    pub async fn rate(&self, film_id: &str, user_id: &str, value: i32) -> AppResult<f64> {
        self.bounds.check(value)?;
        self.user_repo.get_by_id(user_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.film_repo
            .lock_by_id(&txn, film_id)
            .await?
            .ok_or_else(|| AppError::FilmNotFound(film_id.to_string()))?;

        let now = Utc::now();
        let model = rating::ActiveModel {
            id: Set(self.id_gen.generate()),
            film_id: Set(film_id.to_string()),
            user_id: Set(user_id.to_string()),
            value: Set(value),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };
        self.rating_repo.upsert(&txn, model).await?;

        let values = self.rating_repo.values_for_film(&txn, film_id).await?;
        let score = aggregate_score(&values);
        self.film_repo.update_score(&txn, film_id, score).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(film_id = %film_id, user_id = %user_id, value, score, "Film rated");

        record(
            &self.events,
            NewEvent::new(user_id, EventType::Like, Operation::Add, film_id),
        )
        .await;

        Ok(score)
    }

    /// Withdraw a user's rating of a film. Returns the new score.
    pub async fn unrate(&self, film_id: &str, user_id: &str) -> AppResult<f64> {
        self.user_repo.get_by_id(user_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        self.film_repo
            .lock_by_id(&txn, film_id)
            .await?
            .ok_or_else(|| AppError::FilmNotFound(film_id.to_string()))?;

        let removed = self
            .rating_repo
            .delete_by_film_and_user(&txn, film_id, user_id)
            .await?;
        if !removed {
            return Err(AppError::NotFound(format!(
                "Rating of film {film_id} by user {user_id}"
            )));
        }

        let values = self.rating_repo.values_for_film(&txn, film_id).await?;
        let score = aggregate_score(&values);
        self.film_repo.update_score(&txn, film_id, score).await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        tracing::info!(film_id = %film_id, user_id = %user_id, score, "Film rating withdrawn");

        record(
            &self.events,
            NewEvent::new(user_id, EventType::Like, Operation::Remove, film_id),
        )
        .await;

        Ok(score)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::event_ledger::testing::RecordingLedger;
    use chrono::NaiveDate;
    use filmrate_db::entities::{film, user};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::HashMap;

    fn test_user(id: &str) -> user::Model {
        user::Model {
            id: id.to_string(),
            email: format!("{id}@example.com"),
            login: id.to_string(),
            name: id.to_string(),
            birthday: None,
            created_at: Utc::now().into(),
        }
    }

    fn test_film(id: &str, score: f64) -> film::Model {
        film::Model {
            id: id.to_string(),
            name: "Heat".to_string(),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15).unwrap(),
            duration: 170,
            mpa_id: 4,
            score,
            created_at: Utc::now().into(),
        }
    }

    fn test_rating(film_id: &str, user_id: &str, value: i32) -> rating::Model {
        rating::Model {
            id: format!("{film_id}-{user_id}"),
            film_id: film_id.to_string(),
            user_id: user_id.to_string(),
            value,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn aggregator(db: Arc<DatabaseConnection>, events: EventLedgerService) -> RatingAggregator {
        RatingAggregator::new(
            Arc::clone(&db),
            FilmRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            RatingRepository::new(db),
            events,
            RatingBounds::default(),
        )
    }

    #[test]
    fn test_aggregate_score_scenarios() {
        // {A:8, B:6} -> 7.0, then C rates 10 -> 8.0
        assert_eq!(aggregate_score(&[8, 6]), 7.0);
        assert_eq!(aggregate_score(&[8, 6, 10]), 8.0);
        // last rating removed -> 0.0
        assert_eq!(aggregate_score(&[]), 0.0);
        assert_eq!(aggregate_score(&[5]), 5.0);
    }

    #[test]
    fn test_aggregate_score_rounds_to_one_decimal() {
        assert_eq!(aggregate_score(&[7, 8, 8]), 7.7);
        assert_eq!(aggregate_score(&[1, 2]), 1.5);
        assert_eq!(aggregate_score(&[10, 10, 9]), 9.7);
    }

    /// Replaying any rate/unrate sequence against a model keeps the score equal
    /// to the rounded mean of the live ratings.
    #[test]
    fn test_aggregate_tracks_live_ratings() {
        let ops: [(&str, Option<i32>); 8] = [
            ("a", Some(8)),
            ("b", Some(6)),
            ("c", Some(10)),
            ("a", Some(3)),
            ("b", None),
            ("d", Some(7)),
            ("c", None),
            ("a", None),
        ];

        let mut live: HashMap<&str, i32> = HashMap::new();
        for (user, op) in ops {
            match op {
                Some(value) => {
                    live.insert(user, value);
                }
                None => {
                    live.remove(user);
                }
            }
            let values: Vec<i32> = live.values().copied().collect();
            let score = aggregate_score(&values);
            if values.is_empty() {
                assert_eq!(score, 0.0);
            } else {
                let mean = f64::from(values.iter().sum::<i32>()) / values.len() as f64;
                assert!((score - mean).abs() <= 0.05 + f64::EPSILON);
            }
        }
        assert_eq!(aggregate_score(&live.values().copied().collect::<Vec<_>>()), 7.0);
    }

    #[test]
    fn test_bounds() {
        let bounds = RatingBounds { min: 1, max: 10 };
        assert!(bounds.check(1).is_ok());
        assert!(bounds.check(10).is_ok());
        assert!(matches!(bounds.check(0), Err(AppError::Validation(_))));
        assert!(matches!(bounds.check(11), Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_rate_out_of_range_touches_nothing() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());
        let ledger = Arc::new(RecordingLedger::default());
        let service = aggregator(Arc::clone(&db), ledger.clone());

        let result = service.rate("f1", "u1", 42).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(ledger.events().is_empty());
        drop(service);
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        assert!(log.is_empty());
    }

    #[tokio::test]
    async fn test_rate_recomputes_score_and_records_event() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("c")]])
                .append_query_results([[test_film("f1", 7.0)]])
                .append_exec_results([exec(1)])
                .append_query_results([[
                    test_rating("f1", "a", 8),
                    test_rating("f1", "b", 6),
                    test_rating("f1", "c", 10),
                ]])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());
        let service = aggregator(db, ledger.clone());

        let score = service.rate("f1", "c", 10).await.unwrap();

        assert_eq!(score, 8.0);
        assert_eq!(
            ledger.events(),
            vec![NewEvent::new("c", EventType::Like, Operation::Add, "f1")]
        );
    }

    #[tokio::test]
    async fn test_rate_runs_in_one_transaction() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_film("f1", 0.0)]])
                .append_exec_results([exec(1)])
                .append_query_results([[test_rating("f1", "a", 9)]])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let service = aggregator(Arc::clone(&db), Arc::new(RecordingLedger::default()));

        service.rate("f1", "a", 9).await.unwrap();
        drop(service);

        // The user lookup runs on its own; everything else is one committed unit.
        let log = Arc::try_unwrap(db).ok().unwrap().into_transaction_log();
        assert_eq!(log.len(), 2);
    }

    #[tokio::test]
    async fn test_rate_missing_film() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([Vec::<film::Model>::new()])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());
        let service = aggregator(db, ledger.clone());

        let result = service.rate("missing", "a", 5).await;

        assert!(matches!(result, Err(AppError::FilmNotFound(_))));
        assert!(ledger.events().is_empty());
    }

    #[tokio::test]
    async fn test_rate_missing_user() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<user::Model>::new()])
                .into_connection(),
        );
        let service = aggregator(db, Arc::new(RecordingLedger::default()));

        let result = service.rate("f1", "ghost", 5).await;

        assert!(matches!(result, Err(AppError::UserNotFound(_))));
    }

    #[tokio::test]
    async fn test_rate_zero_rows_on_score_update_is_storage_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_film("f1", 0.0)]])
                .append_exec_results([exec(1)])
                .append_query_results([[test_rating("f1", "a", 9)]])
                .append_exec_results([exec(0)])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());
        let service = aggregator(db, ledger.clone());

        let result = service.rate("f1", "a", 9).await;

        assert!(matches!(result, Err(AppError::Storage(_))));
        assert!(ledger.events().is_empty());
    }

    #[tokio::test]
    async fn test_unrate_last_rating_resets_score() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_film("f1", 5.0)]])
                .append_exec_results([exec(1)])
                .append_query_results([Vec::<rating::Model>::new()])
                .append_exec_results([exec(1)])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());
        let service = aggregator(db, ledger.clone());

        let score = service.unrate("f1", "a").await.unwrap();

        assert_eq!(score, 0.0);
        assert_eq!(
            ledger.events(),
            vec![NewEvent::new("a", EventType::Like, Operation::Remove, "f1")]
        );
    }

    #[tokio::test]
    async fn test_unrate_without_rating_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_film("f1", 5.0)]])
                .append_exec_results([exec(0)])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());
        let service = aggregator(db, ledger.clone());

        let result = service.unrate("f1", "a").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
        assert!(ledger.events().is_empty());
    }
}
