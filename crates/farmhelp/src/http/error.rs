use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::agronomy::CoordinateError;
use crate::records::{InvalidRecordId, RecordServiceError, RepositoryError};
use crate::sensors::SensorError;

/// Client-facing failure rendered as `{"detail": ...}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            detail: detail.into(),
        }
    }

    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, detail)
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.detail }));
        (self.status, body).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::new(value.status(), value.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(value: QueryRejection) -> Self {
        Self::new(value.status(), value.body_text())
    }
}

impl From<RecordServiceError> for ApiError {
    fn from(value: RecordServiceError) -> Self {
        match value {
            RecordServiceError::NoData
            | RecordServiceError::EmptyUpdate
            | RecordServiceError::MissingMobile => Self::bad_request(value.to_string()),
            RecordServiceError::NotFound(detail) => Self::new(StatusCode::NOT_FOUND, detail),
            RecordServiceError::Repository(RepositoryError::NotFound) => {
                Self::new(StatusCode::NOT_FOUND, "record not found")
            }
            RecordServiceError::Repository(err) => {
                error!(%err, "repository failure");
                Self::internal(err.to_string())
            }
            RecordServiceError::Upload(err) => {
                error!(%err, "image upload failure");
                Self::new(StatusCode::BAD_GATEWAY, format!("Image upload failed: {err}"))
            }
        }
    }
}

impl From<InvalidRecordId> for ApiError {
    fn from(value: InvalidRecordId) -> Self {
        Self::bad_request(value.to_string())
    }
}

impl From<CoordinateError> for ApiError {
    fn from(value: CoordinateError) -> Self {
        Self::unprocessable(value.to_string())
    }
}

impl From<SensorError> for ApiError {
    fn from(value: SensorError) -> Self {
        Self::bad_request(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (RecordServiceError::EmptyUpdate, StatusCode::BAD_REQUEST),
            (RecordServiceError::MissingMobile, StatusCode::BAD_REQUEST),
            (
                RecordServiceError::NotFound("Farmer not found"),
                StatusCode::NOT_FOUND,
            ),
            (
                RecordServiceError::Repository(RepositoryError::Unavailable("down".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(ApiError::from(error).status, status);
        }
    }

    #[test]
    fn not_found_keeps_detail_text() {
        let error = ApiError::from(RecordServiceError::NotFound("Contact record not found"));
        assert_eq!(error.detail, "Contact record not found");
    }
}
