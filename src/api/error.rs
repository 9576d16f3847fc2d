use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::db::DbError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Internal(&'static str),
    /// Request refused by an extractor before reaching a handler
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl ApiError {
    /// Map a store error. Backend failures are logged here and reach the
    /// caller only as `failure`.
    pub fn from_db(err: DbError, failure: &'static str) -> Self {
        match err {
            DbError::NotFound(entity) => ApiError::NotFound(format!("{entity} not found")),
            DbError::Backend(e) => {
                tracing::error!(error = %e, "{failure}");
                ApiError::Internal(failure)
            }
        }
    }
}

macro_rules! rejected_with {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

rejected_with!(JsonRejection, PathRejection, MultipartRejection);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Rejected { status, .. } => *status,
        };

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn not_found_maps_to_404_with_entity() {
        let response = ApiError::from_db(DbError::NotFound("Client"), "Failed to load client")
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Client not found");
    }

    #[tokio::test]
    async fn backend_failure_hides_details() {
        let err = DbError::Backend(sqlx::Error::RowNotFound);
        let response = ApiError::from_db(err, "Failed to create client").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Failed to create client");
    }

    #[tokio::test]
    async fn rejection_keeps_its_status_with_json_body() {
        let response = ApiError::Rejected {
            status: StatusCode::UNSUPPORTED_MEDIA_TYPE,
            message: "Expected request with `Content-Type: application/json`".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let body = to_bytes(response.into_body(), 1024).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert!(json["error"].as_str().unwrap().contains("Content-Type"));
    }

    #[tokio::test]
    async fn bad_request_returns_400() {
        let response = ApiError::BadRequest("No photos sent".into()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
