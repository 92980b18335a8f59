//! Application error taxonomy and its HTTP rendering.
//!
//! Internally every failure keeps its own kind so it can be logged precisely.
//! Externally all of them collapse into the same body:
//!
//! ```json
//! { "error": "invalid url" }
//! ```
//!
//! The status code that accompanies the body is governed by
//! [`ErrorStatusPolicy`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::utils::db_error::{UniqueKey, unique_violation};

/// The only error message ever shown to API callers.
pub const INVALID_URL: &str = "invalid url";

/// Public error body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Input does not match the URL grammar.
    #[error("malformed url: {url:?}")]
    MalformedUrl { url: String },

    /// Input is well formed but its host has no DNS address.
    #[error("host {host:?} does not resolve: {reason}")]
    UnresolvableHost { host: String, reason: String },

    /// No mapping exists for the requested short code.
    #[error("no mapping for short code {code:?}")]
    NotFound { code: String },

    /// A uniqueness constraint rejected a write.
    #[error("unique constraint violated on {key}")]
    Conflict { key: UniqueKey },

    /// The storage backend failed.
    #[error("storage failure: {message}")]
    StorageFailure { message: String, transient: bool },
}

impl AppError {
    pub fn malformed(url: impl Into<String>) -> Self {
        Self::MalformedUrl { url: url.into() }
    }

    pub fn unresolvable(host: impl Into<String>, reason: impl ToString) -> Self {
        Self::UnresolvableHost {
            host: host.into(),
            reason: reason.to_string(),
        }
    }

    pub fn not_found(code: impl Into<String>) -> Self {
        Self::NotFound { code: code.into() }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageFailure {
            message: message.into(),
            transient: false,
        }
    }

    /// Returns true for storage failures worth a second attempt
    /// (connection drops, pool exhaustion).
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::StorageFailure {
                transient: true,
                ..
            }
        )
    }

    /// Attaches the status policy used to render this error.
    pub fn with_policy(self, policy: ErrorStatusPolicy) -> ErrorResponse {
        ErrorResponse {
            error: self,
            policy,
        }
    }

    fn strict_status(&self) -> StatusCode {
        match self {
            Self::MalformedUrl { .. } | Self::UnresolvableHost { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Conflict { .. } | Self::StorageFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

/// Classifies a database error.
///
/// Unique violations become [`AppError::Conflict`]; I/O errors and pool
/// timeouts are flagged as transient.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(key) = unique_violation(&e) {
        return AppError::Conflict { key };
    }

    let transient = matches!(e, sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut);

    AppError::StorageFailure {
        message: e.to_string(),
        transient,
    }
}

/// How error bodies are paired with HTTP status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorStatusPolicy {
    /// Every error body is sent with `200 OK`, as existing clients expect.
    #[default]
    Compatible,
    /// Errors carry a matching 4xx/5xx status. The body is unchanged.
    Strict,
}

/// An [`AppError`] ready to be rendered under a given [`ErrorStatusPolicy`].
#[derive(Debug)]
pub struct ErrorResponse {
    pub error: AppError,
    pub policy: ErrorStatusPolicy,
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        match &self.error {
            AppError::StorageFailure { .. } | AppError::Conflict { .. } => {
                tracing::error!(error = %self.error, "request failed on storage");
            }
            _ => tracing::debug!(error = %self.error, "request rejected"),
        }

        let status = match self.policy {
            ErrorStatusPolicy::Compatible => StatusCode::OK,
            ErrorStatusPolicy::Strict => self.error.strict_status(),
        };

        (status, Json(ErrorBody { error: INVALID_URL })).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.with_policy(ErrorStatusPolicy::default())
            .into_response()
    }
}
