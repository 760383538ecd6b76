//! Core business logic for filmrate.
//!
//! The rating, review-usefulness and recommendation engine plus the catalog,
//! user and reference-data services around it. Every service talks to storage
//! through `filmrate-db` repositories only.

pub mod services;

pub use services::*;
