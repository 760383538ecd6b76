//! Film endpoints: catalog, ratings, popularity and shared tastes.

use axum::{
    Router,
    extract::State,
    routing::{get, put},
};
use filmrate_common::AppResult;
use filmrate_core::{DirectorFilmsSort, FilmDetails, FilmInput, PopularQuery, UpdateFilmInput};
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery},
    response::ApiResponse,
    state::AppState,
};

/// Rating request body.
#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub score: i32,
}

/// A film's score after a rating change.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResponse {
    pub film_id: String,
    pub score: f64,
}

/// Query for films two users both rated.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommonFilmsQuery {
    pub user_id: String,
    pub friend_id: String,
}

/// Query for a director's films.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorFilmsQuery {
    pub sort_by: Option<String>,
}

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<FilmDetails>>> {
    Ok(ApiResponse::ok(state.film_service.list().await?))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<FilmInput>,
) -> AppResult<ApiResponse<FilmDetails>> {
    Ok(ApiResponse::created(state.film_service.create(input).await?))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateFilmInput>,
) -> AppResult<ApiResponse<FilmDetails>> {
    Ok(ApiResponse::ok(state.film_service.update(input).await?))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<FilmDetails>> {
    Ok(ApiResponse::ok(state.film_service.get(&id).await?))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<()>> {
    state.film_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

async fn popular(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PopularQuery>,
) -> AppResult<ApiResponse<Vec<FilmDetails>>> {
    let films = state.popularity_ranker.popular(&query).await?;
    Ok(ApiResponse::ok(state.film_service.details(films).await?))
}

async fn common(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CommonFilmsQuery>,
) -> AppResult<ApiResponse<Vec<FilmDetails>>> {
    let films = state
        .social_graph
        .common_films(&query.user_id, &query.friend_id)
        .await?;
    Ok(ApiResponse::ok(state.film_service.details(films).await?))
}

async fn by_director(
    State(state): State<AppState>,
    ApiPath(director_id): ApiPath<i32>,
    ApiQuery(query): ApiQuery<DirectorFilmsQuery>,
) -> AppResult<ApiResponse<Vec<FilmDetails>>> {
    let sort = match query.sort_by.as_deref() {
        Some(raw) => raw.parse::<DirectorFilmsSort>()?,
        None => DirectorFilmsSort::Year,
    };
    Ok(ApiResponse::ok(
        state.film_service.director_films(director_id, sort).await?,
    ))
}

async fn rate(
    State(state): State<AppState>,
    ApiPath((film_id, user_id)): ApiPath<(String, String)>,
    ApiJson(req): ApiJson<RateRequest>,
) -> AppResult<ApiResponse<ScoreResponse>> {
    let score = state
        .rating_aggregator
        .rate(&film_id, &user_id, req.score)
        .await?;
    Ok(ApiResponse::ok(ScoreResponse { film_id, score }))
}

async fn unrate(
    State(state): State<AppState>,
    ApiPath((film_id, user_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<ScoreResponse>> {
    let score = state.rating_aggregator.unrate(&film_id, &user_id).await?;
    Ok(ApiResponse::ok(ScoreResponse { film_id, score }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create).put(update))
        .route("/popular", get(popular))
        .route("/common", get(common))
        .route("/director/{director_id}", get(by_director))
        .route("/{id}", get(show).delete(delete))
        .route("/{id}/rating/{user_id}", put(rate).delete(unrate))
}
