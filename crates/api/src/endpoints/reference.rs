//! Reference data endpoints: genres, MPA ratings and directors.

use axum::{Router, extract::State, routing::get};
use filmrate_common::AppResult;
use filmrate_core::{CreateDirectorInput, UpdateDirectorInput};
use filmrate_db::entities::{director, genre, mpa};

use crate::{
    extractors::{ApiJson, ApiPath},
    response::ApiResponse,
    state::AppState,
};

async fn genres(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<genre::Model>>> {
    Ok(ApiResponse::ok(state.reference_service.genres().await?))
}

async fn genre(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<genre::Model>> {
    Ok(ApiResponse::ok(state.reference_service.genre(id).await?))
}

async fn mpa_ratings(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<mpa::Model>>> {
    Ok(ApiResponse::ok(state.reference_service.mpa_ratings().await?))
}

async fn mpa(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<mpa::Model>> {
    Ok(ApiResponse::ok(state.reference_service.mpa(id).await?))
}

async fn directors(
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<director::Model>>> {
    Ok(ApiResponse::ok(state.reference_service.directors().await?))
}

async fn director(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<director::Model>> {
    Ok(ApiResponse::ok(state.reference_service.director(id).await?))
}

async fn create_director(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateDirectorInput>,
) -> AppResult<ApiResponse<director::Model>> {
    Ok(ApiResponse::created(
        state.reference_service.create_director(input).await?,
    ))
}

async fn update_director(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateDirectorInput>,
) -> AppResult<ApiResponse<director::Model>> {
    Ok(ApiResponse::ok(
        state.reference_service.update_director(input).await?,
    ))
}

async fn delete_director(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i32>,
) -> AppResult<ApiResponse<()>> {
    state.reference_service.delete_director(id).await?;
    Ok(ApiResponse::ok(()))
}

pub fn genres_router() -> Router<AppState> {
    Router::new()
        .route("/", get(genres))
        .route("/{id}", get(genre))
}

pub fn mpa_router() -> Router<AppState> {
    Router::new()
        .route("/", get(mpa_ratings))
        .route("/{id}", get(mpa))
}

pub fn directors_router() -> Router<AppState> {
    Router::new()
        .route("/", get(directors).post(create_director).put(update_director))
        .route("/{id}", get(director).delete(delete_director))
}
