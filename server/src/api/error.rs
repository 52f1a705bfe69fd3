use crate::api::ErrorResponse;
use crate::media::{InvalidUpload, MediaError};
use axum::{
    extract::multipart::MultipartError,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use potluck_core::CoreError;
use thiserror::Error;

/// Error returned by handlers. Renders as `{"error": "..."}` with the
/// matching status code; internal details are logged, not returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("Media store error: {0}")]
    Upstream(#[from] MediaError),

    #[error("Database error: {0}")]
    Database(#[from] DieselError),

    #[error("Database pool error: {0}")]
    Pool(#[from] diesel::r2d2::PoolError),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Upstream(_)
            | ApiError::Database(_)
            | ApiError::Pool(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn public_message(&self) -> String {
        match self {
            ApiError::Upstream(_) => "Media upload failed".to_string(),
            ApiError::Database(_) | ApiError::Pool(_) | ApiError::Internal(_) => {
                "Internal server error".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        (
            status,
            Json(ErrorResponse {
                error: self.public_message(),
            }),
        )
            .into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::InvalidArgument(msg) => ApiError::Validation(msg),
            CoreError::NotFound(msg) => ApiError::NotFound(msg),
        }
    }
}

impl From<InvalidUpload> for ApiError {
    fn from(e: InvalidUpload) -> Self {
        match e {
            InvalidUpload::TooLarge { .. } => ApiError::PayloadTooLarge(e.to_string()),
            _ => ApiError::Validation(e.to_string()),
        }
    }
}

impl From<MultipartError> for ApiError {
    fn from(e: MultipartError) -> Self {
        tracing::warn!("Multipart read error: {}", e);
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("File too large".to_string())
        } else {
            ApiError::Validation(format!("Failed to read multipart data: {}", e.body_text()))
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Request body too large".to_string())
        } else {
            ApiError::Validation(e.body_text())
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        ApiError::Validation(e.body_text())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON encoding failed: {}", e))
    }
}

/// Map a unique-constraint violation to 409, everything else as usual.
pub fn conflict_on_unique(e: DieselError, message: &str) -> ApiError {
    match e {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            ApiError::Conflict(message.to_string())
        }
        other => ApiError::Database(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            ApiError::Validation("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::not_found("Recipe").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Upstream(MediaError::NotFound("a".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(DieselError::NotFound).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_core_errors_map_to_client_errors() {
        let err: ApiError = CoreError::InvalidArgument("bad rating".into()).into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.public_message(), "bad rating");
    }

    #[test]
    fn test_upload_errors() {
        let err: ApiError = InvalidUpload::TooLarge { max: 10 }.into();
        assert_eq!(err.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let err: ApiError = InvalidUpload::Empty.into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_details_not_exposed() {
        let err = ApiError::Internal("connection refused on 10.0.0.3".into());
        assert_eq!(err.public_message(), "Internal server error");
    }

    #[test]
    fn test_unique_violation_is_conflict() {
        let err = conflict_on_unique(DieselError::NotFound, "dup");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
