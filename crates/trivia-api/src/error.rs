//! API error types and JSON error response formatting.
//!
//! Every failure leaves a handler as an `ApiError` and is rendered as the
//! uniform envelope `{"success": false, "error": <code>, "message": <text>}`.
//! The message is fixed per kind; the detail string each variant carries is
//! logged and never sent to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use trivia_core::error::TriviaError;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub success: bool,
    /// Numeric error code, one per kind.
    pub error: u16,
    /// Fixed human-readable message, one per kind.
    pub message: String,
}

/// API error taxonomy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Input is present but unusable, or search failed while matching.
    BadRequest(String),
    /// A well-formed request addressed something absent.
    NotFound(String),
    /// The operation cannot be fulfilled the way it was invoked.
    MethodNotAllowed(String),
    /// A category named by a direct listing does not exist.
    UnprocessableEntity(String),
    /// Unexpected store fault during a write.
    ProcessingFailure(String),
}

impl ApiError {
    /// Numeric code for this kind.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound(_) => 404,
            ApiError::MethodNotAllowed(_) => 405,
            ApiError::UnprocessableEntity(_) => 422,
            ApiError::ProcessingFailure(_) => 500,
        }
    }

    /// Client-facing message for this kind.
    pub fn message(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "bad request",
            ApiError::NotFound(_) => "resource not found",
            ApiError::MethodNotAllowed(_) => "method not allowed",
            ApiError::UnprocessableEntity(_) => "unprocessable entity",
            ApiError::ProcessingFailure(_) => "internal server error",
        }
    }

    /// Internal detail, for logs only.
    pub fn detail(&self) -> &str {
        match self {
            ApiError::BadRequest(d)
            | ApiError::NotFound(d)
            | ApiError::MethodNotAllowed(d)
            | ApiError::UnprocessableEntity(d)
            | ApiError::ProcessingFailure(d) => d,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            success: false,
            error: self.code(),
            message: self.message().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::ProcessingFailure(detail) = &self {
            tracing::error!(detail = %detail, "Request failed while processing");
        } else {
            tracing::debug!(code = self.code(), detail = %self.detail(), "Request rejected");
        }
        (self.status(), Json(self.body())).into_response()
    }
}

impl From<TriviaError> for ApiError {
    fn from(err: TriviaError) -> Self {
        match err {
            TriviaError::Validation(msg) => ApiError::BadRequest(msg),
            other => ApiError::ProcessingFailure(other.to_string()),
        }
    }
}
