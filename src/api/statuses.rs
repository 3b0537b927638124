//! Status taxonomy API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{find_record, numeric_id, success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{
    filter_by_module, CreateStatusRequest, StatusDefinition, StatusQuery, UpdateStatusRequest,
};
use crate::AppState;

/// GET /api/statuses - List status definitions, optionally for one module.
pub async fn list_statuses(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(query): Query<StatusQuery>,
) -> ApiResult<Vec<StatusDefinition>> {
    let snapshot = table_store(&state, &session)
        .load::<StatusDefinition>()
        .await?;
    let rows = filter_by_module(snapshot.data, query.module.as_deref())?;
    success(rows, snapshot.sha)
}

/// GET /api/statuses/:id
pub async fn get_status(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> ApiResult<StatusDefinition> {
    let id = numeric_id::<StatusDefinition>(&id)?;
    find_record::<StatusDefinition>(&table_store(&state, &session), &id).await
}

/// POST /api/statuses - Add a status definition.
pub async fn create_status(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<CreateStatusRequest>,
) -> ApiResult<StatusDefinition> {
    request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (status, sha) = table_store(&state, &session)
        .create::<StatusDefinition, _>(expected_sha.as_deref(), |id| {
            StatusDefinition::from_request(id, request)
        })
        .await?;
    success(status, Some(sha))
}

/// PUT /api/statuses/:id - Relabel or recolor a status.
pub async fn update_status(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateStatusRequest>,
) -> ApiResult<StatusDefinition> {
    let id = numeric_id::<StatusDefinition>(&id)?;
    let (status, sha) = table_store(&state, &session)
        .update::<StatusDefinition, _>(&id, request.expected_sha.as_deref(), |s| {
            s.apply(&request)
        })
        .await?;
    success(status, Some(sha))
}
