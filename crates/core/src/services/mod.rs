//! Business logic services.

pub mod event_ledger;
pub mod feed;
pub mod film;
pub mod popular;
pub mod rating;
pub mod recommendation;
pub mod reference;
pub mod review;
pub mod review_vote;
pub mod social;
pub mod user;
pub mod validation;

pub use event_ledger::{DbEventLedger, EventLedger, EventLedgerService, NewEvent};
pub use feed::FeedService;
pub use film::{DirectorFilmsSort, FilmDetails, FilmInput, FilmService, UpdateFilmInput};
pub use popular::{PopularQuery, PopularityRanker};
pub use rating::{RatingAggregator, RatingBounds};
pub use recommendation::{RecommendationPolicy, SimilarityRecommender};
pub use reference::{
    CreateDirectorInput, ReferenceKind, ReferenceLookup, ReferenceLookupService,
    ReferenceService, UpdateDirectorInput,
};
pub use review::{CreateReviewInput, ReviewService, UpdateReviewInput};
pub use review_vote::ReviewVoteLedger;
pub use social::SocialGraphQuery;
pub use user::{UpdateUserInput, UserInput, UserService};
