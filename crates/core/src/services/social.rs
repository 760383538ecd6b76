//! Social graph queries: common friends and common films of two users.

use std::collections::{BTreeSet, HashMap};

use filmrate_common::AppResult;
use filmrate_db::{
    entities::{film, user},
    repositories::{FilmRepository, FriendshipRepository, RatingRepository, UserRepository},
};

/// Order common films by score, then by number of ratings, then by id.
#[must_use]
pub fn order_common_films(
    films: Vec<film::Model>,
    rating_counts: &HashMap<String, u64>,
) -> Vec<film::Model> {
    let mut films = films;
    films.sort_by(|a, b| {
        let count = |f: &film::Model| rating_counts.get(&f.id).copied().unwrap_or(0);
        b.score
            .total_cmp(&a.score)
            .then_with(|| count(b).cmp(&count(a)))
            .then_with(|| a.id.cmp(&b.id))
    });
    films
}

/// Read-only queries across two users.
#[derive(Clone)]
pub struct SocialGraphQuery {
    user_repo: UserRepository,
    friendship_repo: FriendshipRepository,
    rating_repo: RatingRepository,
    film_repo: FilmRepository,
}

impl SocialGraphQuery {
    /// Create a new social graph query service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        friendship_repo: FriendshipRepository,
        rating_repo: RatingRepository,
        film_repo: FilmRepository,
    ) -> Self {
        Self {
            user_repo,
            friendship_repo,
            rating_repo,
            film_repo,
        }
    }

    /// Users both `user_id` and `other_id` have added as friends, ordered by id.
    pub async fn common_friends(
        &self,
        user_id: &str,
        other_id: &str,
    ) -> AppResult<Vec<user::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.get_by_id(other_id).await?;

        let mine: BTreeSet<String> = self
            .friendship_repo
            .friend_ids(user_id)
            .await?
            .into_iter()
            .collect();
        let theirs: BTreeSet<String> = self
            .friendship_repo
            .friend_ids(other_id)
            .await?
            .into_iter()
            .collect();

        let common: Vec<String> = mine.intersection(&theirs).cloned().collect();
        self.user_repo.find_by_ids(&common).await
    }

    /// Films both users rated, most popular first.
    pub async fn common_films(&self, user_id: &str, other_id: &str) -> AppResult<Vec<film::Model>> {
        self.user_repo.get_by_id(user_id).await?;
        self.user_repo.get_by_id(other_id).await?;

        let mine: BTreeSet<String> = self
            .rating_repo
            .find_by_user(user_id)
            .await?
            .into_iter()
            .map(|r| r.film_id)
            .collect();
        let theirs: BTreeSet<String> = self
            .rating_repo
            .find_by_user(other_id)
            .await?
            .into_iter()
            .map(|r| r.film_id)
            .collect();

        let common: Vec<String> = mine.intersection(&theirs).cloned().collect();
        if common.is_empty() {
            return Ok(Vec::new());
        }

        let mut counts: HashMap<String, u64> = HashMap::new();
        for rating in self.rating_repo.find_by_films(&common).await? {
            *counts.entry(rating.film_id).or_default() += 1;
        }

        let films = self.film_repo.find_by_ids(&common).await?;
        Ok(order_common_films(films, &counts))
    }
}
