//! Database repositories.

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

pub use director::DirectorRepository;
pub use event::EventRepository;
pub use film::{FilmOrder, FilmRepository};
pub use film_director::FilmDirectorRepository;
pub use film_genre::FilmGenreRepository;
pub use friendship::FriendshipRepository;
pub use genre::GenreRepository;
pub use mpa::MpaRepository;
pub use rating::RatingRepository;
pub use review::ReviewRepository;
pub use review_vote::ReviewVoteRepository;
pub use user::UserRepository;

use filmrate_common::AppError;
use sea_orm::{DbErr, SqlErr};

/// Map a failed write, reporting a unique-index violation as `Conflict`.
pub(crate) fn write_error(err: &DbErr, conflict: &str) -> AppError {
    classify_write(err.sql_err(), conflict)
        .unwrap_or_else(|| AppError::Database(err.to_string()))
}

fn classify_write(sql_err: Option<SqlErr>, conflict: &str) -> Option<AppError> {
    match sql_err {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            Some(AppError::Conflict(conflict.to_string()))
        }
        _ => None,
    }
}
