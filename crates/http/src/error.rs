//! Error handling for the books API HTTP layer
//!
//! Every error that reaches the transport boundary is one of these tagged
//! kinds; the status mapping below is the single classification point.
//! Handlers log the failure with [`ApiError::logged`] before returning, so
//! the event lands inside their request span.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use books_domain::ValidationError;
use books_store::StoreError;

/// Message sent instead of internal error details.
const INTERNAL_SERVER_ERROR_MESSAGE: &str = "internal server error";

/// Application error types that map to HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("empty request body")]
    EmptyRequestBody,

    #[error("failed to read request body")]
    UnreadableBody,

    #[error("failed to parse json body")]
    MalformedJson,

    #[error("invalid review")]
    InvalidReview,

    #[error("empty book id in request")]
    EmptyBookId,

    #[error("empty review id in request")]
    EmptyReviewId,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid offset query parameter")]
    InvalidOffsetParameter,

    #[error("invalid limit query parameter")]
    InvalidLimitParameter,

    #[error("offset must not be negative")]
    InvalidOffset,

    #[error("limit exceeds the maximum of {max}")]
    LimitExceeded { max: usize },

    #[error("api version invalid, requires update to version in path. valid versions are: {}", valid.join(", "))]
    InvalidVersion { valid: Vec<String> },

    #[error("book not found")]
    BookNotFound,

    #[error("review not found")]
    ReviewNotFound,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Transport status for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::EmptyRequestBody
            | ApiError::UnreadableBody
            | ApiError::MalformedJson
            | ApiError::InvalidReview
            | ApiError::EmptyBookId
            | ApiError::EmptyReviewId
            | ApiError::Validation(_)
            | ApiError::InvalidOffsetParameter
            | ApiError::InvalidLimitParameter
            | ApiError::InvalidOffset
            | ApiError::LimitExceeded { .. } => StatusCode::BAD_REQUEST,

            ApiError::InvalidVersion { .. }
            | ApiError::BookNotFound
            | ApiError::ReviewNotFound => StatusCode::NOT_FOUND,

            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Emit the single failure log for this request.
    ///
    /// Handlers call this at their boundary, inside their instrumented
    /// span, so the recorded request context (requested version, resource
    /// ids, resolved pagination) travels with the event.
    pub fn logged(self) -> Self {
        let status = self.status();
        match &self {
            // Internal details are logged in full but never sent to the caller.
            ApiError::Internal(err) => {
                tracing::error!(
                    error = ?err,
                    response_status = status.as_u16(),
                    "request unsuccessful"
                );
            }
            other => {
                tracing::error!(
                    error = %other,
                    response_status = status.as_u16(),
                    "request unsuccessful"
                );
            }
        }
        self
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::BookNotFound => ApiError::BookNotFound,
            StoreError::ReviewNotFound => ApiError::ReviewNotFound,
            StoreError::Backend(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Internal(_) => INTERNAL_SERVER_ERROR_MESSAGE.to_string(),
            other => other.to_string(),
        };

        (status, message).into_response()
    }
}
