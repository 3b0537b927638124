//! Error handling module for the fleet dashboard backend.
//!
//! Provides centralized error types with mapping to HTTP status codes and response envelopes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::github::GitHubError;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const REPO_ACCESS_DENIED: &str = "REPO_ACCESS_DENIED";
    pub const REPO_EXISTS: &str = "REPO_EXISTS";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const SHA_MISMATCH: &str = "SHA_MISMATCH";
    pub const UPSTREAM_ERROR: &str = "UPSTREAM_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Bad or missing credentials (GitHub token or session handle)
    Unauthorized(String),
    /// Token is valid but the repository is not reachable with it
    Forbidden(String),
    /// Repository name already taken under the account
    NameConflict(String),
    /// Resource not found
    NotFound(String),
    /// Validation error
    Validation(String),
    /// Table changed since the caller read it
    Conflict {
        message: String,
        current_sha: Option<String>,
    },
    /// Network failure or malformed data from GitHub
    Upstream(String),
    /// A value could not be serialized for a commit
    Internal(String),
}

impl AppError {
    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NameConflict(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Unauthorized(_) => codes::UNAUTHORIZED,
            AppError::Forbidden(_) => codes::REPO_ACCESS_DENIED,
            AppError::NameConflict(_) => codes::REPO_EXISTS,
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Conflict { .. } => codes::SHA_MISMATCH,
            AppError::Upstream(_) => codes::UPSTREAM_ERROR,
            AppError::Internal(_) => codes::INTERNAL_ERROR,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::NameConflict(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Upstream(msg)
            | AppError::Internal(msg) => msg.clone(),
            AppError::Conflict { message, .. } => message.clone(),
        }
    }

    /// Prefix the message with `context`, keeping the variant.
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        let wrap = |msg: String| format!("{}: {}", context, msg);
        match self {
            AppError::Unauthorized(msg) => AppError::Unauthorized(wrap(msg)),
            AppError::Forbidden(msg) => AppError::Forbidden(wrap(msg)),
            AppError::NameConflict(msg) => AppError::NameConflict(wrap(msg)),
            AppError::NotFound(msg) => AppError::NotFound(wrap(msg)),
            AppError::Validation(msg) => AppError::Validation(wrap(msg)),
            AppError::Upstream(msg) => AppError::Upstream(wrap(msg)),
            AppError::Internal(msg) => AppError::Internal(wrap(msg)),
            AppError::Conflict {
                message,
                current_sha,
            } => AppError::Conflict {
                message: wrap(message),
                current_sha,
            },
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<GitHubError> for AppError {
    fn from(err: GitHubError) -> Self {
        match err {
            GitHubError::Unauthorized => {
                AppError::Unauthorized("GitHub rejected the access token".to_string())
            }
            GitHubError::NotFound(what) | GitHubError::Forbidden(what) => {
                AppError::Forbidden(format!("No access to {}", what))
            }
            GitHubError::NameTaken(name) => AppError::NameConflict(format!(
                "A repository named {} already exists on this account",
                name
            )),
            GitHubError::ShaConflict { path, current_sha } => AppError::Conflict {
                message: format!("{} was modified by another writer", path),
                current_sha,
            },
            other => {
                tracing::error!("GitHub error: {}", other);
                AppError::Upstream(other.to_string())
            }
        }
    }
}

/// Bytes read from GitHub are decoded with explicit `Upstream` errors, so a
/// bare `serde_json::Error` reaching `?` is a failure to encode our own data.
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON encoding error: {:?}", err);
        AppError::Internal(format!("Failed to encode table data: {}", err))
    }
}

/// Error details in the response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error response envelope.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetails,
}

impl ErrorResponse {
    pub fn new(error: &AppError) -> Self {
        let details = match error {
            AppError::Conflict { current_sha, .. } => {
                Some(serde_json::json!({ "currentSha": current_sha }))
            }
            _ => None,
        };

        Self {
            success: false,
            error: ErrorDetails {
                code: error.error_code().to_string(),
                message: error.message(),
                details,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse::new(&self);
        (status, Json(body)).into_response()
    }
}
