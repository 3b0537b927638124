//! Session endpoints: login, registration, logout.

use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Extension, Json};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::auth::{self, Session, SessionInfo};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub token: String,
    #[serde(default)]
    pub owner: Option<String>,
    pub repo: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub token: String,
    pub repo: String,
}

/// Returned once; the handle authenticates every later request.
#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub handle: String,
    pub session: SessionInfo,
}

async fn open(state: &AppState, session: Session) -> SessionCreated {
    let session = state.sessions.insert(session).await;
    SessionCreated {
        handle: session.handle(),
        session: session.info(),
    }
}

/// POST /api/session/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<SessionCreated> {
    let session = auth::login(
        &state.github,
        &request.token,
        request.owner.as_deref(),
        request.repo.trim(),
    )
    .await?;
    success(open(&state, session).await, None)
}

/// POST /api/session/register - Create and seed a repository, then log in.
pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<SessionCreated> {
    let session = auth::register(&state.github, &request.token, request.repo.trim()).await?;
    success(open(&state, session).await, None)
}

/// POST /api/session/logout
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<bool> {
    let removed = match auth::session_handle(&headers) {
        Some(handle) => state.sessions.remove(&handle).await,
        None => false,
    };
    success(removed, None)
}

/// GET /api/session
pub async fn current_session(Extension(session): Extension<Arc<Session>>) -> ApiResult<SessionInfo> {
    success(session.info(), None)
}
