//! # API Error Types
//!
//! Maps proxy failures onto 404 and 500. Error responses carry no body.
//! Logging happens in the dispatcher, which knows the request.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mrp_core::{ErrorClass, ProxyError};
use thiserror::Error;

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The requested file does not exist in this repository view (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The request was well-formed but could not be served (500).
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// Return the HTTP status code and machine-readable error code for this error.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, _) = self.status_and_code();
        status.into_response()
    }
}

impl From<ProxyError> for ApiError {
    fn from(err: ProxyError) -> Self {
        match err.class() {
            ErrorClass::NotFound => Self::NotFound(err.to_string()),
            ErrorClass::Internal => Self::Internal(err.to_string()),
        }
    }
}
