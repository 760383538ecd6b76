//! User endpoints: accounts, friends, recommendations and the feed.

use axum::{
    Router,
    extract::State,
    routing::{get, put},
};
use chrono::NaiveDate;
use filmrate_common::AppResult;
use filmrate_core::{FilmDetails, UpdateUserInput, UserInput};
use filmrate_db::entities::{
    event::{self, EventType, Operation},
    user,
};
use serde::Serialize;

use crate::{
    extractors::{ApiJson, ApiPath},
    response::ApiResponse,
    state::AppState,
};

/// User response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub login: String,
    pub name: String,
    pub birthday: Option<NaiveDate>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            login: user.login,
            name: user.name,
            birthday: user.birthday,
        }
    }
}

/// Feed entry response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub event_id: String,
    pub user_id: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub event_type: EventType,
    pub operation: Operation,
    pub entity_id: String,
}

impl From<event::Model> for EventResponse {
    fn from(event: event::Model) -> Self {
        Self {
            event_id: event.id,
            user_id: event.user_id,
            timestamp: event.timestamp,
            event_type: event.event_type,
            operation: event.operation,
            entity_id: event.entity_id,
        }
    }
}

fn users(models: Vec<user::Model>) -> Vec<UserResponse> {
    models.into_iter().map(Into::into).collect()
}

async fn list(State(state): State<AppState>) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    Ok(ApiResponse::ok(users(state.user_service.list().await?)))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.create(input).await?;
    Ok(ApiResponse::created(user.into()))
}

async fn update(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<UpdateUserInput>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.update(input).await?;
    Ok(ApiResponse::ok(user.into()))
}

async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let user = state.user_service.get(&id).await?;
    Ok(ApiResponse::ok(user.into()))
}

async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.delete(&id).await?;
    Ok(ApiResponse::ok(()))
}

async fn add_friend(
    State(state): State<AppState>,
    ApiPath((id, friend_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.add_friend(&id, &friend_id).await?;
    Ok(ApiResponse::ok(()))
}

async fn remove_friend(
    State(state): State<AppState>,
    ApiPath((id, friend_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.remove_friend(&id, &friend_id).await?;
    Ok(ApiResponse::ok(()))
}

async fn friends(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    Ok(ApiResponse::ok(users(state.user_service.friends(&id).await?)))
}

async fn common_friends(
    State(state): State<AppState>,
    ApiPath((id, other_id)): ApiPath<(String, String)>,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let common = state.social_graph.common_friends(&id, &other_id).await?;
    Ok(ApiResponse::ok(users(common)))
}

async fn recommendations(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<Vec<FilmDetails>>> {
    let films = state.recommender.recommend(&id).await?;
    Ok(ApiResponse::ok(state.film_service.details(films).await?))
}

async fn feed(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> AppResult<ApiResponse<Vec<EventResponse>>> {
    let events = state.feed_service.feed(&id).await?;
    Ok(ApiResponse::ok(events.into_iter().map(Into::into).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list).post(create).put(update))
        .route("/{id}", get(show).delete(delete))
        .route("/{id}/friends", get(friends))
        .route("/{id}/friends/{friend_id}", put(add_friend).delete(remove_friend))
        .route("/{id}/friends/common/{other_id}", get(common_friends))
        .route("/{id}/recommendations", get(recommendations))
        .route("/{id}/feed", get(feed))
}
