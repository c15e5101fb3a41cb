//! Request body intake and versioned response writing
//!
//! Responses carry `application/vnd.books.<version>+json` so callers can
//! see which contract produced the payload even when the request relied on
//! the default version.

use axum::{
    body::Bytes,
    extract::rejection::BytesRejection,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::ApiError;

/// Content type for a response produced under the given API version.
pub fn content_type(version: &str) -> String {
    format!("application/vnd.books.{version}+json; charset=utf-8")
}

/// Serialize the provided model and write it with the versioned content type.
pub fn versioned_json<T: Serialize>(
    status: StatusCode,
    version: &str,
    value: &T,
) -> Result<Response, ApiError> {
    let payload = serde_json::to_vec(value).map_err(anyhow::Error::new)?;
    Ok((
        status,
        [(header::CONTENT_TYPE, content_type(version))],
        payload,
    )
        .into_response())
}

/// Headers-only response with the versioned content type.
pub fn versioned_empty(status: StatusCode, version: &str) -> Response {
    (status, [(header::CONTENT_TYPE, content_type(version))]).into_response()
}

/// Accept a buffered request body, rejecting unreadable or empty bodies.
pub fn require_body(body: Result<Bytes, BytesRejection>) -> Result<Bytes, ApiError> {
    let body = body.map_err(|_| ApiError::UnreadableBody)?;
    if body.is_empty() {
        return Err(ApiError::EmptyRequestBody);
    }
    Ok(body)
}

/// Decode a JSON request body into the provided model.
pub fn read_json_body<T: DeserializeOwned>(body: &Bytes) -> Result<T, ApiError> {
    serde_json::from_slice(body).map_err(|_| ApiError::MalformedJson)
}
