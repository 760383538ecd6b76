//! HTTP API layer for filmrate.
//!
//! - **Endpoints**: films, ratings, reviews and votes, users and friends,
//!   reference data
//! - **Extractors**: JSON, path and query extraction with `AppError` rejections
//! - **State**: the services shared by every handler
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod response;
pub mod state;

pub use endpoints::router;
pub use state::AppState;
