//! Feed service.

use filmrate_common::AppResult;
use filmrate_db::{
    entities::event,
    repositories::{EventRepository, UserRepository},
};

/// Reads a user's action log.
#[derive(Clone)]
pub struct FeedService {
    event_repo: EventRepository,
    user_repo: UserRepository,
}

impl FeedService {
    /// Create a new feed service.
    #[must_use]
    pub const fn new(event_repo: EventRepository, user_repo: UserRepository) -> Self {
        Self {
            event_repo,
            user_repo,
        }
    }

    /// The user's events in the order they were appended.
    pub async fn feed(&self, user_id: &str) -> AppResult<Vec<event::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.event_repo.find_by_user(user_id).await
    }
}
