//! Review service.

use chrono::Utc;
use filmrate_common::{AppError, AppResult, IdGenerator};
use filmrate_db::{
    entities::{
        event::{EventType, Operation},
        review,
    },
    repositories::{FilmRepository, ReviewRepository, UserRepository},
};
use sea_orm::{NotSet, Set};
use serde::Deserialize;
use validator::Validate;

use crate::services::event_ledger::{EventLedgerService, NewEvent, record};
use crate::services::validation;

/// Reviews returned when no count is given.
pub const DEFAULT_REVIEW_COUNT: u64 = 10;

/// Input for creating a review.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewInput {
    /// Review text; must not be blank.
    #[validate(custom(function = "validation::not_blank"))]
    pub content: String,
    /// Whether the review recommends the film.
    pub is_positive: bool,
    /// Author.
    pub user_id: String,
    /// Reviewed film.
    pub film_id: String,
}

/// Input for updating a review. Author, film and usefulness cannot change.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReviewInput {
    /// Review to update.
    pub review_id: String,
    /// New text; must not be blank.
    #[validate(custom(function = "validation::not_blank"))]
    pub content: String,
    /// New verdict.
    pub is_positive: bool,
}

/// Review service for business logic.
#[derive(Clone)]
pub struct ReviewService {
    review_repo: ReviewRepository,
    user_repo: UserRepository,
    film_repo: FilmRepository,
    events: EventLedgerService,
    id_gen: IdGenerator,
}

impl ReviewService {
    /// Create a new review service.
    #[must_use]
    pub const fn new(
        review_repo: ReviewRepository,
        user_repo: UserRepository,
        film_repo: FilmRepository,
        events: EventLedgerService,
    ) -> Self {
        Self {
            review_repo,
            user_repo,
            film_repo,
            events,
            id_gen: IdGenerator::new(),
        }
    }

    /// Get a review.
    pub async fn get(&self, id: &str) -> AppResult<review::Model> {
        self.review_repo.get_by_id(id).await
    }

    /// Most useful reviews, of one film or across the catalog.
    pub async fn list(
        &self,
        film_id: Option<&str>,
        count: Option<u64>,
    ) -> AppResult<Vec<review::Model>> {
        let count = count.unwrap_or(DEFAULT_REVIEW_COUNT);
        if count == 0 {
            return Err(AppError::Validation(
                "count must be a positive number".to_string(),
            ));
        }
        self.review_repo.find_most_useful(film_id, count).await
    }

    /// Write a review.
    pub async fn create(&self, input: CreateReviewInput) -> AppResult<review::Model> {
        input.validate()?;
        self.user_repo.get_by_id(&input.user_id).await?;
        self.film_repo.get_by_id(&input.film_id).await?;

        let model = review::ActiveModel {
            id: Set(self.id_gen.generate()),
            content: Set(input.content),
            is_positive: Set(input.is_positive),
            user_id: Set(input.user_id),
            film_id: Set(input.film_id),
            useful: Set(0),
            created_at: Set(Utc::now().into()),
        };
        let created = self.review_repo.create(model).await?;

        tracing::info!(review_id = %created.id, film_id = %created.film_id, "Review created");
        record(
            &self.events,
            NewEvent::new(&created.user_id, EventType::Review, Operation::Add, &created.id),
        )
        .await;
        Ok(created)
    }

    /// Edit a review's text and verdict.
    pub async fn update(&self, input: UpdateReviewInput) -> AppResult<review::Model> {
        input.validate()?;
        let existing = self.review_repo.get_by_id(&input.review_id).await?;

        let model = review::ActiveModel {
            id: Set(existing.id),
            content: Set(input.content),
            is_positive: Set(input.is_positive),
            user_id: NotSet,
            film_id: NotSet,
            useful: NotSet,
            created_at: NotSet,
        };
        let updated = self.review_repo.update(model).await?;

        tracing::info!(review_id = %updated.id, "Review updated");
        record(
            &self.events,
            NewEvent::new(&updated.user_id, EventType::Review, Operation::Update, &updated.id),
        )
        .await;
        Ok(updated)
    }

    /// Delete a review and its votes.
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let existing = self.review_repo.get_by_id(id).await?;
        if !self.review_repo.delete(id).await? {
            return Err(AppError::ReviewNotFound(id.to_string()));
        }

        tracing::info!(review_id = %id, "Review deleted");
        record(
            &self.events,
            NewEvent::new(&existing.user_id, EventType::Review, Operation::Remove, id),
        )
        .await;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::event_ledger::testing::RecordingLedger;
    use chrono::NaiveDate;
    use filmrate_db::entities::{film, user};
    use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
    use std::sync::Arc;

    fn test_review(id: &str, useful: i32) -> review::Model {
        review::Model {
            id: id.to_string(),
            content: "Tense and long".to_string(),
            is_positive: true,
            user_id: "a".to_string(),
            film_id: "f1".to_string(),
            useful,
            created_at: Utc::now().into(),
        }
    }

    fn service(db: Arc<DatabaseConnection>, ledger: Arc<RecordingLedger>) -> ReviewService {
        ReviewService::new(
            ReviewRepository::new(Arc::clone(&db)),
            UserRepository::new(Arc::clone(&db)),
            FilmRepository::new(db),
            ledger,
        )
    }

    #[tokio::test]
    async fn test_create_starts_at_zero_usefulness() {
        let author = user::Model {
            id: "a".to_string(),
            email: "a@example.com".to_string(),
            login: "a".to_string(),
            name: "a".to_string(),
            birthday: None,
            created_at: Utc::now().into(),
        };
        let subject = film::Model {
            id: "f1".to_string(),
            name: "Heat".to_string(),
            description: String::new(),
            release_date: NaiveDate::from_ymd_opt(1995, 12, 15).unwrap(),
            duration: 170,
            mpa_id: 4,
            score: 0.0,
            created_at: Utc::now().into(),
        };
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[author]])
                .append_query_results([[subject]])
                .append_query_results([[test_review("r1", 0)]])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());

        let created = service(db, ledger.clone())
            .create(CreateReviewInput {
                content: "Tense and long".to_string(),
                is_positive: true,
                user_id: "a".to_string(),
                film_id: "f1".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(created.useful, 0);
        assert_eq!(
            ledger.events(),
            vec![NewEvent::new("a", EventType::Review, Operation::Add, "r1")]
        );
    }

    #[tokio::test]
    async fn test_update_preserves_usefulness() {
        let mut updated = test_review("r1", 4);
        updated.content = "Rewatched, still great".to_string();
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_review("r1", 4)]])
                .append_query_results([[updated]])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());

        let result = service(db, ledger.clone())
            .update(UpdateReviewInput {
                review_id: "r1".to_string(),
                content: "Rewatched, still great".to_string(),
                is_positive: true,
            })
            .await
            .unwrap();

        assert_eq!(result.useful, 4);
        assert_eq!(ledger.events()[0].operation, Operation::Update);
    }

    #[tokio::test]
    async fn test_blank_content_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db, Arc::default())
            .create(CreateReviewInput {
                content: " ".to_string(),
                is_positive: false,
                user_id: "a".to_string(),
                film_id: "f1".to_string(),
            })
            .await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_delete_records_event() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_review("r1", 0)]])
                .append_exec_results([MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                }])
                .into_connection(),
        );
        let ledger = Arc::new(RecordingLedger::default());

        service(db, ledger.clone()).delete("r1").await.unwrap();

        assert_eq!(
            ledger.events(),
            vec![NewEvent::new("a", EventType::Review, Operation::Remove, "r1")]
        );
    }

    #[tokio::test]
    async fn test_list_zero_count_rejected() {
        let db = Arc::new(MockDatabase::new(DatabaseBackend::Postgres).into_connection());

        let result = service(db, Arc::default()).list(Some("f1"), Some(0)).await;

        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
