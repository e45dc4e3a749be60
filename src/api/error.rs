use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{DramaError, ValidationErrors};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    InvalidForm(ValidationErrors),

    /// Request body that is not a JSON form at all.
    MalformedBody(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InvalidForm(errors) => write!(f, "Invalid form: {}", errors),
            ApiError::MalformedBody(msg) => write!(f, "Malformed request body: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ApiResponse::<()>::error(msg)),
            ApiError::ValidationError(msg) => {
                (StatusCode::BAD_REQUEST, ApiResponse::<()>::error(msg))
            }
            ApiError::InvalidForm(errors) => (
                StatusCode::BAD_REQUEST,
                ApiResponse::<()>::invalid(errors.to_string(), errors.errors),
            ),
            ApiError::MalformedBody(msg) => {
                tracing::debug!(%msg, "Rejected request body");
                (StatusCode::BAD_REQUEST, ApiResponse::<()>::error(msg))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::MalformedBody(rejection.body_text())
    }
}

impl From<DramaError> for ApiError {
    fn from(err: DramaError) -> Self {
        match err {
            DramaError::NotFound(id) => Self::drama_not_found(id),
            DramaError::Validation(errors) => Self::InvalidForm(errors),
            other @ (DramaError::UnknownPrefix(_) | DramaError::AmbiguousPrefix(_)) => {
                Self::validation(other.to_string())
            }
        }
    }
}

impl ApiError {
    pub fn not_found(resource: &str, id: impl fmt::Display) -> Self {
        ApiError::NotFound(format!("{} {} not found", resource, id))
    }

    pub fn drama_not_found(id: impl fmt::Display) -> Self {
        Self::not_found("Drama", id)
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }
}
