//! Review vote ledger.
//!
//! Each (review, user) pair is a small state machine over `{none, liked,
//! disliked}`. A transition yields the next state and the usefulness delta;
//! the vote row and the review's counter change together in one transaction.

use std::sync::Arc;

use chrono::Utc;
use filmrate_common::{AppError, AppResult, IdGenerator};
use filmrate_db::{
    entities::review_vote::{self, VoteKind},
    repositories::{ReviewRepository, ReviewVoteRepository, UserRepository},
};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};

/// A user's current vote on a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteState {
    /// No vote.
    None,
    /// A like.
    Liked,
    /// A dislike.
    Disliked,
}

impl From<Option<VoteKind>> for VoteState {
    fn from(kind: Option<VoteKind>) -> Self {
        match kind {
            None => Self::None,
            Some(VoteKind::Like) => Self::Liked,
            Some(VoteKind::Dislike) => Self::Disliked,
        }
    }
}

/// A vote request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteAction {
    /// Like the review.
    Like,
    /// Dislike the review.
    Dislike,
    /// Withdraw a like.
    RemoveLike,
    /// Withdraw a dislike.
    RemoveDislike,
}

/// Outcome of applying a [`VoteAction`] to a [`VoteState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    /// Vote state after the action.
    pub next: VoteState,
    /// Change to the review's usefulness counter.
    pub delta: i32,
}

impl VoteTransition {
    /// Whether the transition leaves everything as it was.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.delta == 0
    }
}

/// Compute the transition for `action` from `current`.
///
/// Repeating a vote is a no-op; retracting a vote the user does not hold is
/// `NotFound`.
pub fn transition(current: VoteState, action: VoteAction) -> AppResult<VoteTransition> {
    let (next, delta) = match (action, current) {
        (VoteAction::Like, VoteState::None) => (VoteState::Liked, 1),
        (VoteAction::Like, VoteState::Disliked) => (VoteState::Liked, 2),
        (VoteAction::Like, VoteState::Liked) => (VoteState::Liked, 0),
        (VoteAction::Dislike, VoteState::None) => (VoteState::Disliked, -1),
        (VoteAction::Dislike, VoteState::Liked) => (VoteState::Disliked, -2),
        (VoteAction::Dislike, VoteState::Disliked) => (VoteState::Disliked, 0),
        (VoteAction::RemoveLike, VoteState::Liked) => (VoteState::None, -1),
        (VoteAction::RemoveDislike, VoteState::Disliked) => (VoteState::None, 1),
        (VoteAction::RemoveLike, _) => {
            return Err(AppError::NotFound("Like on review".to_string()));
        }
        (VoteAction::RemoveDislike, _) => {
            return Err(AppError::NotFound("Dislike on review".to_string()));
        }
    };
    Ok(VoteTransition { next, delta })
}

/// Service applying votes to reviews.
#[derive(Clone)]
pub struct ReviewVoteLedger {
    db: Arc<DatabaseConnection>,
    review_repo: ReviewRepository,
    vote_repo: ReviewVoteRepository,
    user_repo: UserRepository,
    id_gen: IdGenerator,
}

impl ReviewVoteLedger {
    /// Create a new review vote ledger.
    #[must_use]
    pub const fn new(
        db: Arc<DatabaseConnection>,
        review_repo: ReviewRepository,
        vote_repo: ReviewVoteRepository,
        user_repo: UserRepository,
    ) -> Self {
        Self {
            db,
            review_repo,
            vote_repo,
            user_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Like a review. Returns the review's usefulness afterwards.
    pub async fn like(&self, review_id: &str, user_id: &str) -> AppResult<i32> {
        self.apply(review_id, user_id, VoteAction::Like).await
    }

    /// Dislike a review. Returns the review's usefulness afterwards.
    pub async fn dislike(&self, review_id: &str, user_id: &str) -> AppResult<i32> {
        self.apply(review_id, user_id, VoteAction::Dislike).await
    }

    /// Withdraw a like. Returns the review's usefulness afterwards.
    pub async fn remove_like(&self, review_id: &str, user_id: &str) -> AppResult<i32> {
        self.apply(review_id, user_id, VoteAction::RemoveLike).await
    }

    /// Withdraw a dislike. Returns the review's usefulness afterwards.
    pub async fn remove_dislike(&self, review_id: &str, user_id: &str) -> AppResult<i32> {
        self.apply(review_id, user_id, VoteAction::RemoveDislike)
            .await
    }

    async fn apply(&self, review_id: &str, user_id: &str, action: VoteAction) -> AppResult<i32> {
        self.user_repo.get_by_id(user_id).await?;

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let review = self
            .review_repo
            .lock_by_id(&txn, review_id)
            .await?
            .ok_or_else(|| AppError::ReviewNotFound(review_id.to_string()))?;

        let current = self
            .vote_repo
            .find_by_review_and_user(&txn, review_id, user_id)
            .await?
            .map(|vote| vote.kind);
        let step = transition(VoteState::from(current), action)?;

        if step.is_noop() {
            txn.commit()
                .await
                .map_err(|e| AppError::Database(e.to_string()))?;
            return Ok(review.useful);
        }

        match step.next {
            VoteState::None => {
                let removed = self
                    .vote_repo
                    .delete_by_review_and_user(&txn, review_id, user_id)
                    .await?;
                if !removed {
                    return Err(AppError::Storage(format!(
                        "vote of user {user_id} on review {review_id} was not removed"
                    )));
                }
            }
            VoteState::Liked | VoteState::Disliked => {
                let kind = if step.next == VoteState::Liked {
                    VoteKind::Like
                } else {
                    VoteKind::Dislike
                };
                let model = review_vote::ActiveModel {
                    id: Set(self.id_gen.generate()),
                    review_id: Set(review_id.to_string()),
                    user_id: Set(user_id.to_string()),
                    kind: Set(kind),
                    created_at: Set(Utc::now().into()),
                };
                self.vote_repo.put(&txn, model).await?;
            }
        }

        self.review_repo
            .adjust_useful(&txn, review_id, step.delta)
            .await?;

        txn.commit()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let useful = review.useful + step.delta;
        tracing::debug!(
            review_id = %review_id,
            user_id = %user_id,
            action = ?action,
            useful,
            "Review vote applied"
        );

        Ok(useful)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use filmrate_db::entities::{review, user};
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use std::collections::HashMap;

    const ACTIONS: [VoteAction; 4] = [
        VoteAction::Like,
        VoteAction::Dislike,
        VoteAction::RemoveLike,
        VoteAction::RemoveDislike,
    ];

    /// In-memory model of one review: each user's state plus the counter.
    #[derive(Default)]
    struct Tally {
        votes: HashMap<&'static str, VoteState>,
        useful: i32,
    }

    impl Tally {
        fn apply(&mut self, user: &'static str, action: VoteAction) -> AppResult<()> {
            let current = *self.votes.get(user).unwrap_or(&VoteState::None);
            let step = transition(current, action)?;
            self.votes.insert(user, step.next);
            self.useful += step.delta;
            Ok(())
        }

        fn counted(&self) -> i32 {
            self.votes
                .values()
                .map(|state| match state {
                    VoteState::Liked => 1,
                    VoteState::Disliked => -1,
                    VoteState::None => 0,
                })
                .sum()
        }
    }

    #[test]
    fn test_like_dislike_remove_scenario() {
        let mut tally = Tally::default();
        tally.apply("a", VoteAction::Like).unwrap();
        assert_eq!(tally.useful, 1);
        tally.apply("a", VoteAction::Dislike).unwrap();
        assert_eq!(tally.useful, -1);
        tally.apply("a", VoteAction::RemoveDislike).unwrap();
        assert_eq!(tally.useful, 0);
    }

    #[test]
    fn test_transition_table() {
        let like = transition(VoteState::Disliked, VoteAction::Like).unwrap();
        assert_eq!(like.next, VoteState::Liked);
        assert_eq!(like.delta, 2);

        let dislike = transition(VoteState::Liked, VoteAction::Dislike).unwrap();
        assert_eq!(dislike.next, VoteState::Disliked);
        assert_eq!(dislike.delta, -2);

        let dislike = transition(VoteState::None, VoteAction::Dislike).unwrap();
        assert_eq!(dislike.delta, -1);

        assert!(matches!(
            transition(VoteState::None, VoteAction::RemoveLike),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            transition(VoteState::Disliked, VoteAction::RemoveLike),
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            transition(VoteState::Liked, VoteAction::RemoveDislike),
            Err(AppError::NotFound(_))
        ));
    }

    #[test]
    fn test_repeated_like_is_idempotent() {
        let once = transition(VoteState::None, VoteAction::Like).unwrap();
        let twice = transition(once.next, VoteAction::Like).unwrap();

        assert_eq!(twice.next, once.next);
        assert!(twice.is_noop());
        assert_eq!(once.delta + twice.delta, once.delta);
    }

    /// Walk every action sequence of length 4 for three users: the counter
    /// always equals likes minus dislikes, and each user holds one state.
    #[test]
    fn test_usefulness_matches_recorded_votes_for_all_sequences() {
        let users = ["a", "b", "c"];
        let steps: Vec<(&str, VoteAction)> = users
            .iter()
            .flat_map(|u| ACTIONS.iter().map(move |a| (*u, *a)))
            .collect();

        for first in &steps {
            for second in &steps {
                for third in &steps {
                    for fourth in &steps {
                        let mut tally = Tally::default();
                        for (user, action) in [first, second, third, fourth] {
                            let before = tally.useful;
                            if tally.apply(*user, *action).is_err() {
                                assert_eq!(tally.useful, before);
                            }
                            assert_eq!(tally.useful, tally.counted());
                        }
                    }
                }
            }
        }
    }

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

    fn test_review(id: &str, useful: i32) -> review::Model {
        review::Model {
            id: id.to_string(),
            content: "Solid".to_string(),
            is_positive: true,
            user_id: "author".to_string(),
            film_id: "f1".to_string(),
            useful,
            created_at: Utc::now().into(),
        }
    }

    fn test_vote(kind: VoteKind) -> review_vote::Model {
        review_vote::Model {
            id: "v1".to_string(),
            review_id: "r1".to_string(),
            user_id: "a".to_string(),
            kind,
            created_at: Utc::now().into(),
        }
    }

    fn exec(rows_affected: u64) -> MockExecResult {
        MockExecResult {
            last_insert_id: 0,
            rows_affected,
        }
    }

    fn ledger(db: Arc<DatabaseConnection>) -> ReviewVoteLedger {
        ReviewVoteLedger::new(
            Arc::clone(&db),
            ReviewRepository::new(Arc::clone(&db)),
            ReviewVoteRepository::new(),
            UserRepository::new(db),
        )
    }

    #[tokio::test]
    async fn test_like_flips_dislike() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_review("r1", -1)]])
                .append_query_results([[test_vote(VoteKind::Dislike)]])
                .append_exec_results([exec(1), exec(1)])
                .into_connection(),
        );

        let useful = ledger(db).like("r1", "a").await.unwrap();

        assert_eq!(useful, 1);
    }

    #[tokio::test]
    async fn test_repeat_like_writes_nothing() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_review("r1", 1)]])
                .append_query_results([[test_vote(VoteKind::Like)]])
                .into_connection(),
        );

        let useful = ledger(db).like("r1", "a").await.unwrap();

        assert_eq!(useful, 1);
    }

    #[tokio::test]
    async fn test_remove_like_without_like_is_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_review("r1", 0)]])
                .append_query_results([Vec::<review_vote::Model>::new()])
                .into_connection(),
        );

        let result = ledger(db).remove_like("r1", "a").await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_dislike() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_review("r1", -1)]])
                .append_query_results([[test_vote(VoteKind::Dislike)]])
                .append_exec_results([exec(1), exec(1)])
                .into_connection(),
        );

        let useful = ledger(db).remove_dislike("r1", "a").await.unwrap();

        assert_eq!(useful, 0);
    }

    #[tokio::test]
    async fn test_vote_on_missing_review() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([Vec::<review::Model>::new()])
                .into_connection(),
        );

        let result = ledger(db).dislike("missing", "a").await;

        assert!(matches!(result, Err(AppError::ReviewNotFound(_))));
    }

    #[tokio::test]
    async fn test_counter_not_updated_is_storage_error() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[test_user("a")]])
                .append_query_results([[test_review("r1", 0)]])
                .append_query_results([Vec::<review_vote::Model>::new()])
                .append_exec_results([exec(1), exec(0)])
                .into_connection(),
        );

        let result = ledger(db).like("r1", "a").await;

        assert!(matches!(result, Err(AppError::Storage(_))));
    }
}
