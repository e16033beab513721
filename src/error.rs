// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use crate::services::{CompositionError, MalformedInputError, RetrievalError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    MalformedInput(#[from] MalformedInputError),

    #[error(transparent)]
    Retrieval(#[from] RetrievalError),

    #[error(transparent)]
    Composition(#[from] CompositionError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::MalformedInput(err) => (
                StatusCode::BAD_REQUEST,
                "malformed_input",
                Some(err.to_string()),
            ),
            AppError::Retrieval(RetrievalError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "invalid_token", None)
            }
            AppError::Retrieval(RetrievalError::RateLimited) => (
                StatusCode::TOO_MANY_REQUESTS,
                "rate_limited",
                Some("Strava rate limit exceeded, try again later".to_string()),
            ),
            AppError::Retrieval(err) => {
                tracing::warn!(error = %err, "Activity retrieval failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "retrieval_error",
                    Some(err.to_string()),
                )
            }
            AppError::Composition(err) => {
                tracing::error!(error = %err, "Overlay composition failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "composition_error",
                    Some(err.to_string()),
                )
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
