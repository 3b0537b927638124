//! Session authentication.
//!
//! Protected routes require a session handle, sent either as
//! `Authorization: Bearer <handle>` or in the `x-session-token` header.
//! Secrets are compared in constant time.

mod provision;
mod session;

pub use provision::*;
pub use session::*;

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header name for the session handle.
pub const SESSION_HEADER: &str = "x-session-token";

/// Session handle carried by a request, if any.
pub fn session_handle(headers: &HeaderMap) -> Option<String> {
    let explicit = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());
    if let Some(handle) = explicit {
        return Some(handle.to_string());
    }

    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve the request's session and hand it to the handler as an extension.
pub async fn session_auth_layer(
    State(sessions): State<Arc<SessionStore>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(handle) = session_handle(request.headers()) else {
        return unauthorized_response("Missing session token");
    };

    match sessions.resolve(&handle).await {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => {
            tracing::debug!("rejected unknown session handle");
            unauthorized_response("Invalid or expired session")
        }
    }
}

/// Perform constant-time string comparison.
pub(crate) fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

fn unauthorized_response(message: &str) -> Response {
    AppError::Unauthorized(message.to_string()).into_response()
}
