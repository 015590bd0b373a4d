//! HTTP error mapping.

use axum::{
    extract::rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    http::{header, HeaderValue, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::error;

/// Errors returned by handlers, rendered as `{"error": "<message>"}`.
#[derive(Debug)]
pub enum ApiError {
    /// Datastore or other internal failure. Details are logged, not returned.
    Internal(kedai_core::Error),
    Unauthorized(String),
    NotFound(String),
    BadRequest(String),
}

impl From<kedai_core::Error> for ApiError {
    fn from(err: kedai_core::Error) -> Self {
        match err {
            kedai_core::Error::NotFound(msg) => ApiError::NotFound(msg),
            kedai_core::Error::MerchantNotFound(_) => {
                ApiError::NotFound("Merchant not found".to_string())
            }
            kedai_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            // Duplicate registrations are reported as a plain bad request.
            kedai_core::Error::Conflict(msg) => ApiError::BadRequest(msg),
            kedai_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg),
            other => ApiError::Internal(other),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ApiError::Internal(err) => {
                error!(subsystem = "api", error = %err, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::Unauthorized(msg) => {
                let body = Json(serde_json::json!({ "error": msg }));
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"))],
                    body,
                )
                    .into_response();
            }
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_error_mapping() {
        assert!(matches!(
            ApiError::from(kedai_core::Error::MerchantNotFound(3)),
            ApiError::NotFound(msg) if msg == "Merchant not found"
        ));
        assert!(matches!(
            ApiError::from(kedai_core::Error::InvalidInput("x".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(kedai_core::Error::Conflict("dup".into())),
            ApiError::BadRequest(_)
        ));
        assert!(matches!(
            ApiError::from(kedai_core::Error::Database(sqlx::Error::PoolTimedOut)),
            ApiError::Internal(_)
        ));
    }

    #[test]
    fn test_status_codes() {
        let resp = ApiError::NotFound("gone".into()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = ApiError::BadRequest("bad".into()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let resp = ApiError::Internal(kedai_core::Error::Internal("boom".into())).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_unauthorized_sets_www_authenticate() {
        let resp = ApiError::Unauthorized("nope".into()).into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            resp.headers().get(header::WWW_AUTHENTICATE).unwrap(),
            "Bearer"
        );
    }
}
