//! Driver API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{find_record, list_records, numeric_id, success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{CreateDriverRequest, Driver, ListQuery, UpdateDriverRequest};
use crate::AppState;

/// GET /api/drivers - List drivers, optionally filtered by status.
pub async fn list_drivers(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Driver>> {
    let store = table_store(&state, &session);
    let snapshot = list_records::<Driver>(&store, query.status.as_deref()).await?;
    success(snapshot.data, snapshot.sha)
}

/// GET /api/drivers/:id - Get a single driver.
pub async fn get_driver(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> ApiResult<Driver> {
    let id = numeric_id::<Driver>(&id)?;
    find_record::<Driver>(&table_store(&state, &session), &id).await
}

/// POST /api/drivers - Add a driver.
pub async fn create_driver(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<CreateDriverRequest>,
) -> ApiResult<Driver> {
    request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (driver, sha) = table_store(&state, &session)
        .create::<Driver, _>(expected_sha.as_deref(), |id| Driver::from_request(id, request))
        .await?;
    success(driver, Some(sha))
}

/// PUT /api/drivers/:id - Update a driver.
pub async fn update_driver(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateDriverRequest>,
) -> ApiResult<Driver> {
    let id = numeric_id::<Driver>(&id)?;
    let (driver, sha) = table_store(&state, &session)
        .update::<Driver, _>(&id, request.expected_sha.as_deref(), |d| d.apply(&request))
        .await?;
    success(driver, Some(sha))
}
