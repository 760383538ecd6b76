//! Database entities.

pub mod director;
pub mod event;
pub mod film;
pub mod film_director;
pub mod film_genre;
pub mod friendship;
pub mod genre;
pub mod mpa;
pub mod rating;
pub mod review;
pub mod review_vote;
pub mod user;

pub use director::Entity as Director;
pub use event::Entity as Event;
pub use film::Entity as Film;
pub use film_director::Entity as FilmDirector;
pub use film_genre::Entity as FilmGenre;
pub use friendship::Entity as Friendship;
pub use genre::Entity as Genre;
pub use mpa::Entity as Mpa;
pub use rating::Entity as Rating;
pub use review::Entity as Review;
pub use review_vote::Entity as ReviewVote;
pub use user::Entity as User;
