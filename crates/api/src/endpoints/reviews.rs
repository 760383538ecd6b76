//! Review endpoints and usefulness votes.

use axum::{
    Router,
    extract::State,
    routing::{get, put},
};
use filmrate_common::AppResult;
use filmrate_core::{CreateReviewInput, UpdateReviewInput};
use filmrate_db::entities::review;
use serde::{Deserialize, Serialize};

use crate::{
    extractors::{ApiJson, ApiPath, ApiQuery},
    response::ApiResponse,
    state::AppState,
};

/// Review response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review_id: String,
    pub content: String,
    pub is_positive: bool,
    pub user_id: String,
    pub film_id: String,
    pub useful: i32,
}

impl From<review::Model> for ReviewResponse {
    fn from(review: review::Model) -> Self {
        Self {
            review_id: review.id,
            content: review.content,
            is_positive: review.is_positive,
            user_id: review.user_id,
            film_id: review.film_id,
            useful: review.useful,
        }
    }
}

/// A review's usefulness after a vote.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsefulResponse {
    pub review_id: String,
    pub useful: i32,
}

/// Review list query.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListReviewsQuery {
    pub film_id: Option<String>,
    pub count: Option<u64>,
}

async fn list(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ListReviewsQuery>,
) -> AppResult<ApiResponse<Vec<ReviewResponse>>> {
    let reviews = state
        .review_service
        .list(query.film_id.as_deref(), query.count)
        .await?;
    Ok(ApiResponse::ok(reviews.into_iter().map(Into::into).collect()))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<CreateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.create(input).await?;
    Ok(ApiResponse::created(review.into()))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateReviewInput>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.update(input).await?;
    Ok(ApiResponse::ok(review.into()))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<ReviewResponse>> {
    let review = state.review_service.get(&id).await?;
    Ok(ApiResponse::ok(review.into()))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<()>> {
    state.review_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

async fn like(
    State(state): State<AppState>,
    ApiPath((review_id, user_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<UsefulResponse>> {
    let useful = state.vote_ledger.like(&review_id, &user_id).await?;
    Ok(ApiResponse::ok(UsefulResponse { review_id, useful }))
}

async fn remove_like(
    State(state): State<AppState>,
    ApiPath((review_id, user_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<UsefulResponse>> {
    let useful = state.vote_ledger.remove_like(&review_id, &user_id).await?;
    Ok(ApiResponse::ok(UsefulResponse { review_id, useful }))
}

async fn dislike(
    State(state): State<AppState>,
    ApiPath((review_id, user_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<UsefulResponse>> {
    let useful = state.vote_ledger.dislike(&review_id, &user_id).await?;
    Ok(ApiResponse::ok(UsefulResponse { review_id, useful }))
}

async fn remove_dislike(
    State(state): State<AppState>,
    ApiPath((review_id, user_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<UsefulResponse>> {
    let useful = state
        .vote_ledger
        .remove_dislike(&review_id, &user_id)
        .await?;
    Ok(ApiResponse::ok(UsefulResponse { review_id, useful }))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create).put(update))
        .route("/{id}", get(show).delete(delete))
        .route("/{id}/like/{user_id}", put(like).delete(remove_like))
        .route("/{id}/dislike/{user_id}", put(dislike).delete(remove_dislike))
}
