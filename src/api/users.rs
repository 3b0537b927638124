//! User API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{find_record, list_records, numeric_id, success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{CreateUserRequest, User, ListQuery, UpdateUserRequest};
use crate::AppState;

/// GET /api/users - List users, optionally filtered by status.
pub async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<User>> {
    let store = table_store(&state, &session);
    let snapshot = list_records::<User>(&store, query.status.as_deref()).await?;
    success(snapshot.data, snapshot.sha)
}

/// GET /api/users/:id - Get a single user.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> ApiResult<User> {
    let id = numeric_id::<User>(&id)?;
    find_record::<User>(&table_store(&state, &session), &id).await
}

/// POST /api/users - Invite a user.
pub async fn create_user(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<CreateUserRequest>,
) -> ApiResult<User> {
    request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (user, sha) = table_store(&state, &session)
        .create::<User, _>(expected_sha.as_deref(), |id| User::from_request(id, request))
        .await?;
    success(user, Some(sha))
}

/// PUT /api/users/:id - Update a user.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateUserRequest>,
) -> ApiResult<User> {
    let id = numeric_id::<User>(&id)?;
    let (user, sha) = table_store(&state, &session)
        .update::<User, _>(&id, request.expected_sha.as_deref(), |d| d.apply(&request))
        .await?;
    success(user, Some(sha))
}
