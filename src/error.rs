//! Error types and handling for the `SentinelX` service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::envelope::ApiResponse;

/// Main error type for the `SentinelX` service
#[derive(Error, Debug)]
pub enum SentinelError {
    /// Input validation errors, one message per failing field
    #[error("Validation error: {}", errors.join(", "))]
    Validation { errors: Vec<String> },

    /// Upstream provider errors
    #[error("API error: {message}")]
    Api { message: String },

    /// Request body over the configured limit
    #[error("Request body too large")]
    PayloadTooLarge,

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Anything else; `message` is safe to show to clients
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl SentinelError {
    /// Create a validation error for a single field
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            errors: vec![message.into()],
        }
    }

    /// Create a validation error listing every failing field
    #[must_use]
    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }

    /// Create a new API error
    pub fn api<S: Into<String>>(message: S) -> Self {
        Self::Api {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            SentinelError::Validation { .. } => StatusCode::BAD_REQUEST,
            SentinelError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get a client-facing error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SentinelError::Validation { .. } | SentinelError::PayloadTooLarge => self.to_string(),
            SentinelError::Api { .. } => {
                "Unable to reach upstream data providers.".to_string()
            }
            SentinelError::Config { .. } => "Service is misconfigured.".to_string(),
            SentinelError::Internal { message } => message.clone(),
        }
    }
}

impl From<anyhow::Error> for SentinelError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<SentinelError>() {
            Ok(sentinel) => sentinel,
            Err(other) => {
                tracing::error!("Unexpected error: {other:#}");
                SentinelError::internal("An unexpected error occurred")
            }
        }
    }
}

impl IntoResponse for SentinelError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }
        (status, ApiResponse::<()>::error(self.user_message())).into_response()
    }
}
