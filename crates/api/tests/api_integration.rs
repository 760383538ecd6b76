//! API integration tests.
//!
//! Drive the full router over a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Utc;
use filmrate_api::{AppState, router as api_router};
use filmrate_common::config::{
    Config, DatabaseConfig, RatingConfig, RecommendationConfig, ServerConfig,
};
use filmrate_db::entities::{genre, review, user};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase, MockExecResult};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        rating: RatingConfig::default(),
        recommendation: RecommendationConfig::default(),
    }
}

fn app(db: DatabaseConnection) -> Router {
    api_router().with_state(AppState::new(Arc::new(db), &create_test_config()))
}

fn empty_db() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn test_user(id: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        email: format!("{id}@example.com"),
        login: id.to_string(),
        name: id.to_string(),
        birthday: None,
        created_at: Utc::now().into(),
    }
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = send(app(empty_db()), "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_list_genres_uses_envelope() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![
            genre::Model {
                id: 1,
                name: "Comedy".to_string(),
            },
            genre::Model {
                id: 2,
                name: "Drama".to_string(),
            },
        ]])
        .into_connection();

    let (status, body) = send(app(db), "GET", "/genres", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "data": [{ "id": 1, "name": "Comedy" }, { "id": 2, "name": "Drama" }] })
    );
}

#[tokio::test]
async fn test_unknown_film_is_404() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<filmrate_db::entities::film::Model>::new()])
        .into_connection();

    let (status, body) = send(app(db), "GET", "/films/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "FILM_NOT_FOUND");
}

#[tokio::test]
async fn test_rating_out_of_bounds_is_400() {
    let (status, body) = send(
        app(empty_db()),
        "PUT",
        "/films/f1/rating/u1",
        Some(json!({ "score": 11 })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_director_sort_is_400() {
    let (status, body) = send(
        app(empty_db()),
        "GET",
        "/films/director/1?sortBy=rating",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_popular_zero_count_is_400() {
    let (status, _) = send(app(empty_db()), "GET", "/films/popular?count=0", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (status, body) = send(
        app(empty_db()),
        "POST",
        "/users",
        Some(json!({ "login": "neo" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_self_friendship_is_400() {
    let (status, body) = send(app(empty_db()), "PUT", "/users/a/friends/a", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_get_user_hides_internal_fields() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1")]])
        .into_connection();

    let (status, body) = send(app(db), "GET", "/users/u1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "data": {
                "id": "u1",
                "email": "u1@example.com",
                "login": "u1",
                "name": "u1",
                "birthday": null
            }
        })
    );
}

#[tokio::test]
async fn test_review_list_zero_count_is_400() {
    let (status, _) = send(app(empty_db()), "GET", "/reviews?count=0", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_like_review_returns_usefulness() {
    let target = review::Model {
        id: "r1".to_string(),
        content: "Great pacing".to_string(),
        is_positive: true,
        user_id: "author".to_string(),
        film_id: "f1".to_string(),
        useful: 2,
        created_at: Utc::now().into(),
    };
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([[test_user("u1")]])
        .append_query_results([[target]])
        .append_query_results([Vec::<filmrate_db::entities::review_vote::Model>::new()])
        .append_exec_results([
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
            MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            },
        ])
        .into_connection();

    let (status, body) = send(app(db), "PUT", "/reviews/r1/like/u1", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "data": { "reviewId": "r1", "useful": 3 } }));
}
