//! Similarity recommender.
//!
//! Collaborative filtering over ratings: users who rated the same films close
//! to the target user become neighbors, and well-scored films they rated that
//! the target has not are proposed, strongest neighbor first.

use std::collections::{HashMap, HashSet};

use filmrate_common::{AppResult, config::RecommendationConfig};
use filmrate_db::{
    entities::{film, rating},
    repositories::{FilmRepository, RatingRepository, UserRepository},
};

/// Tunable recommendation thresholds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationPolicy {
    /// Maximum rating difference on a shared film that still counts as agreement.
    pub similarity_threshold: i32,
    /// Minimum film score to be recommended.
    pub quality_floor: f64,
}

impl Default for RecommendationPolicy {
    fn default() -> Self {
        Self::from(&RecommendationConfig::default())
    }
}

impl From<&RecommendationConfig> for RecommendationPolicy {
    fn from(config: &RecommendationConfig) -> Self {
        Self {
            similarity_threshold: config.similarity_threshold,
            quality_floor: config.quality_floor,
        }
    }
}

/// Weight of every neighbor: the number of films both rated within `threshold`
/// of each other. Users with no agreeing film are left out.
#[must_use]
pub fn neighbor_weights(
    target: &[rating::Model],
    co_ratings: &[rating::Model],
    threshold: i32,
) -> HashMap<String, u32> {
    let mine: HashMap<&str, i32> = target
        .iter()
        .map(|r| (r.film_id.as_str(), r.value))
        .collect();

    let mut weights: HashMap<String, u32> = HashMap::new();
    for other in co_ratings {
        let Some(&value) = mine.get(other.film_id.as_str()) else {
            continue;
        };
        if (value - other.value).abs() <= threshold {
            *weights.entry(other.user_id.clone()).or_default() += 1;
        }
    }
    weights
}

/// Films rated by neighbors and not by the target, scored at least
/// `quality_floor`, ordered by best neighbor weight, then score, then id.
#[must_use]
pub fn rank_candidates(
    target: &[rating::Model],
    weights: &HashMap<String, u32>,
    neighbor_ratings: &[rating::Model],
    films: Vec<film::Model>,
    quality_floor: f64,
) -> Vec<film::Model> {
    let seen: HashSet<&str> = target.iter().map(|r| r.film_id.as_str()).collect();

    let mut best: HashMap<&str, u32> = HashMap::new();
    for r in neighbor_ratings {
        if seen.contains(r.film_id.as_str()) {
            continue;
        }
        let Some(&weight) = weights.get(&r.user_id) else {
            continue;
        };
        let entry = best.entry(r.film_id.as_str()).or_default();
        *entry = (*entry).max(weight);
    }

    let mut ranked: Vec<(u32, film::Model)> = films
        .into_iter()
        .filter(|f| f.score >= quality_floor)
        .filter_map(|f| best.get(f.id.as_str()).map(|&w| (w, f)))
        .collect();

    ranked.sort_by(|(wa, a), (wb, b)| {
        wb.cmp(wa)
            .then_with(|| b.score.total_cmp(&a.score))
            .then_with(|| a.id.cmp(&b.id))
    });

    ranked.into_iter().map(|(_, f)| f).collect()
}

/// Service proposing unseen films from taste neighbors.
#[derive(Clone)]
pub struct SimilarityRecommender {
    film_repo: FilmRepository,
    rating_repo: RatingRepository,
    user_repo: UserRepository,
    policy: RecommendationPolicy,
}

impl SimilarityRecommender {
    /// Create a new recommender.
    #[must_use]
    pub const fn new(
        film_repo: FilmRepository,
        rating_repo: RatingRepository,
        user_repo: UserRepository,
        policy: RecommendationPolicy,
    ) -> Self {
        Self {
            film_repo,
            rating_repo,
            user_repo,
            policy,
        }
    }

    /// Recommendations for a user. Empty when the user has no ratings or no neighbors.
    pub async fn recommend(&self, user_id: &str) -> AppResult<Vec<film::Model>> {
        self.user_repo.get_by_id(user_id).await?;

        let target = self.rating_repo.find_by_user(user_id).await?;
        if target.is_empty() {
            return Ok(Vec::new());
        }

        let rated: Vec<String> = target.iter().map(|r| r.film_id.clone()).collect();
        let co_ratings = self.rating_repo.find_co_ratings(user_id, &rated).await?;
        let weights = neighbor_weights(&target, &co_ratings, self.policy.similarity_threshold);
        if weights.is_empty() {
            return Ok(Vec::new());
        }

        let mut neighbors: Vec<String> = weights.keys().cloned().collect();
        neighbors.sort();
        let neighbor_ratings = self.rating_repo.find_by_users(&neighbors).await?;

        let seen: HashSet<&str> = rated.iter().map(String::as_str).collect();
        let mut candidates: Vec<String> = neighbor_ratings
            .iter()
            .map(|r| r.film_id.as_str())
            .filter(|id| !seen.contains(id))
            .collect::<HashSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect();
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        candidates.sort();

        let films = self.film_repo.find_by_ids(&candidates).await?;
        let recommended = rank_candidates(
            &target,
            &weights,
            &neighbor_ratings,
            films,
            self.policy.quality_floor,
        );

        tracing::debug!(
            user_id = %user_id,
            neighbors = neighbors.len(),
            candidates = candidates.len(),
            recommended = recommended.len(),
            "Recommendations computed"
        );

        Ok(recommended)
    }
}
