//! Application state.

#![allow(missing_docs)]

use std::sync::Arc;

use filmrate_common::Config;
use filmrate_core::{
    DbEventLedger, EventLedgerService, FeedService, FilmService, PopularityRanker,
    RatingAggregator, RatingBounds, RecommendationPolicy, ReferenceService, ReviewService,
    ReviewVoteLedger, SimilarityRecommender, SocialGraphQuery, UserService,
};
use filmrate_db::repositories::{
    DirectorRepository, EventRepository, FilmDirectorRepository, FilmGenreRepository,
    FilmRepository, FriendshipRepository, GenreRepository, MpaRepository, RatingRepository,
    ReviewRepository, ReviewVoteRepository, UserRepository,
};
use sea_orm::DatabaseConnection;

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub film_service: FilmService,
    pub rating_aggregator: RatingAggregator,
    pub popularity_ranker: PopularityRanker,
    pub recommender: SimilarityRecommender,
    pub social_graph: SocialGraphQuery,
    pub user_service: UserService,
    pub review_service: ReviewService,
    pub vote_ledger: ReviewVoteLedger,
    pub feed_service: FeedService,
    pub reference_service: ReferenceService,
}

impl AppState {
    /// Wire every repository and service over one connection pool.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>, config: &Config) -> Self {
        let film_repo = FilmRepository::new(Arc::clone(&db));
        let film_genre_repo = FilmGenreRepository::new(Arc::clone(&db));
        let film_director_repo = FilmDirectorRepository::new(Arc::clone(&db));
        let user_repo = UserRepository::new(Arc::clone(&db));
        let friendship_repo = FriendshipRepository::new(Arc::clone(&db));
        let rating_repo = RatingRepository::new(Arc::clone(&db));
        let review_repo = ReviewRepository::new(Arc::clone(&db));
        let review_vote_repo = ReviewVoteRepository::new();
        let event_repo = EventRepository::new(Arc::clone(&db));
        let mpa_repo = MpaRepository::new(Arc::clone(&db));
        let genre_repo = GenreRepository::new(Arc::clone(&db));
        let director_repo = DirectorRepository::new(Arc::clone(&db));

        let events: EventLedgerService = Arc::new(DbEventLedger::new(event_repo.clone()));
        let reference_service = ReferenceService::new(mpa_repo, genre_repo, director_repo);

        Self {
            film_service: FilmService::new(
                Arc::clone(&db),
                film_repo.clone(),
                film_genre_repo,
                film_director_repo,
                Arc::new(reference_service.clone()),
            ),
            rating_aggregator: RatingAggregator::new(
                Arc::clone(&db),
                film_repo.clone(),
                user_repo.clone(),
                rating_repo.clone(),
                Arc::clone(&events),
                RatingBounds::from(&config.rating),
            ),
            popularity_ranker: PopularityRanker::new(film_repo.clone()),
            recommender: SimilarityRecommender::new(
                film_repo.clone(),
                rating_repo.clone(),
                user_repo.clone(),
                RecommendationPolicy::from(&config.recommendation),
            ),
            social_graph: SocialGraphQuery::new(
                user_repo.clone(),
                friendship_repo.clone(),
                rating_repo,
                film_repo.clone(),
            ),
            user_service: UserService::new(
                user_repo.clone(),
                friendship_repo,
                Arc::clone(&events),
            ),
            review_service: ReviewService::new(
                review_repo.clone(),
                user_repo.clone(),
                film_repo,
                events,
            ),
            vote_ledger: ReviewVoteLedger::new(
                db,
                review_repo,
                review_vote_repo,
                user_repo.clone(),
            ),
            feed_service: FeedService::new(event_repo, user_repo),
            reference_service,
        }
    }
}
