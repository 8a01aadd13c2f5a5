use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use menulens_core::domain::common::entities::app_errors::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use validator::ValidationErrors;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    UnsupportedMediaType(String),

    #[error("{0}")]
    BadGateway(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    InternalServerError(String),
}

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ApiErrorResponse {
    pub code: String,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "E_VALIDATION"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "E_NOT_FOUND"),
            ApiError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "E_FILE_TOO_LARGE"),
            ApiError::UnsupportedMediaType(_) => {
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "E_UNSUPPORTED_TYPE")
            }
            ApiError::BadGateway(_) => (StatusCode::BAD_GATEWAY, "E_PROVIDER_UNAVAILABLE"),
            ApiError::ServiceUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "E_PROVIDER_REJECTED")
            }
            ApiError::InternalServerError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "E_INTERNAL"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let body = ApiErrorResponse {
            code: code.to_string(),
            status: status.as_u16(),
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::Validation(_) => ApiError::BadRequest(error.to_string()),
            CoreError::FileTooLarge { .. } => ApiError::PayloadTooLarge(error.to_string()),
            CoreError::UnsupportedContentType(_) => {
                ApiError::UnsupportedMediaType(error.to_string())
            }
            CoreError::NotFound => ApiError::NotFound("Menu image not found".to_string()),
            CoreError::ProviderUnavailable(_) => ApiError::BadGateway(error.to_string()),
            CoreError::ProviderRejected(_) => ApiError::ServiceUnavailable(error.to_string()),
            CoreError::Storage(_) | CoreError::InternalServerError => {
                tracing::error!(error = %error, "Request failed");
                ApiError::InternalServerError("Internal server error".to_string())
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::BadRequest(format!("Validation error: {errors}"))
    }
}

impl From<MultipartError> for ApiError {
    fn from(error: MultipartError) -> Self {
        if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(error.body_text())
        } else {
            ApiError::BadRequest(format!("Failed to read multipart form: {}", error.body_text()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_distinct_statuses() {
        let cases = [
            (CoreError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (
                CoreError::FileTooLarge { size: 11, max: 10 },
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                CoreError::UnsupportedContentType("image/gif".into()),
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ),
            (CoreError::NotFound, StatusCode::NOT_FOUND),
            (
                CoreError::ProviderUnavailable("timeout".into()),
                StatusCode::BAD_GATEWAY,
            ),
            (
                CoreError::ProviderRejected("401".into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                CoreError::Storage("disk full".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (core, expected) in cases {
            let (status, _) = ApiError::from(core).status_and_code();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_storage_details_are_not_leaked() {
        let error = ApiError::from(CoreError::Storage("/var/secret/path".into()));
        assert_eq!(error.to_string(), "Internal server error");
    }
}
