//! API endpoints.

mod films;
mod health;
mod reference;
mod reviews;
mod users;

use axum::Router;

use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .nest("/films", films::router())
        .nest("/users", users::router())
        .nest("/reviews", reviews::router())
        .nest("/genres", reference::genres_router())
        .nest("/mpa", reference::mpa_router())
        .nest("/directors", reference::directors_router())
}
