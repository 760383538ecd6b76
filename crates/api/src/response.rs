//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    #[serde(skip)]
    status: StatusCode,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response.
    pub const fn ok(data: T) -> Self {
        Self {
            data,
            status: StatusCode::OK,
        }
    }

    /// Create a response for a newly stored resource.
    pub const fn created(data: T) -> Self {
        Self {
            data,
            status: StatusCode::CREATED,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2])).unwrap();
        assert_eq!(json, serde_json::json!({ "data": [1, 2] }));

        let json = serde_json::to_value(ApiResponse::created("x")).unwrap();
        assert_eq!(json, serde_json::json!({ "data": "x" }));
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiResponse::ok(()).into_response().status(), StatusCode::OK);
        assert_eq!(
            ApiResponse::created(()).into_response().status(),
            StatusCode::CREATED
        );
    }
}
