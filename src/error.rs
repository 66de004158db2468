// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Errors returned by the contact endpoint.
//!
//! Every variant maps to a status code and a coarse client-facing message.
//! Detail carried by a variant is for logs only.

use crate::metrics::Outcome;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContactError {
    #[error("Too many requests, retry in {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Malformed request body: {0}")]
    MalformedRequest(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Invalid email format")]
    InvalidEmail,

    #[error("Delivery failed: {0}")]
    DeliveryFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ContactError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::MalformedRequest(_) | Self::ValidationFailed(_) | Self::InvalidEmail => {
                StatusCode::BAD_REQUEST
            }
            Self::DeliveryFailed(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message shown to the client.
    pub fn public_message(&self) -> String {
        match self {
            Self::RateLimited { retry_after_secs } => format!(
                "Too many requests. Please try again in {retry_after_secs} seconds."
            ),
            Self::MalformedRequest(_) => "Invalid request body".to_string(),
            Self::ValidationFailed(_) => "Invalid form data".to_string(),
            Self::InvalidEmail => "Invalid email format".to_string(),
            Self::DeliveryFailed(_) => {
                "Failed to process contact form. Please try again.".to_string()
            }
            Self::Internal(_) => "Internal server error".to_string(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        match self {
            Self::RateLimited { .. } => Outcome::RateLimited,
            Self::MalformedRequest(_) => Outcome::Malformed,
            Self::ValidationFailed(_) | Self::InvalidEmail => Outcome::Invalid,
            Self::DeliveryFailed(_) => Outcome::DeliveryFailed,
            Self::Internal(_) => Outcome::Internal,
        }
    }
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.public_message(),
        });

        match self {
            Self::RateLimited { retry_after_secs } => (
                StatusCode::TOO_MANY_REQUESTS,
                [(header::RETRY_AFTER, retry_after_secs.to_string())],
                body,
            )
                .into_response(),
            other => (other.status(), body).into_response(),
        }
    }
}
