//! Car API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{find_record, list_records, numeric_id, success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{CreateCarRequest, Car, ListQuery, UpdateCarRequest};
use crate::AppState;

/// GET /api/cars - List cars, optionally filtered by status.
pub async fn list_cars(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Car>> {
    let store = table_store(&state, &session);
    let snapshot = list_records::<Car>(&store, query.status.as_deref()).await?;
    success(snapshot.data, snapshot.sha)
}

/// GET /api/cars/:id - Get a single car.
pub async fn get_car(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> ApiResult<Car> {
    let id = numeric_id::<Car>(&id)?;
    find_record::<Car>(&table_store(&state, &session), &id).await
}

/// POST /api/cars - Add a car.
pub async fn create_car(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<CreateCarRequest>,
) -> ApiResult<Car> {
    request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (car, sha) = table_store(&state, &session)
        .create::<Car, _>(expected_sha.as_deref(), |id| Car::from_request(id, request))
        .await?;
    success(car, Some(sha))
}

/// PUT /api/cars/:id - Update a car.
pub async fn update_car(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCarRequest>,
) -> ApiResult<Car> {
    let id = numeric_id::<Car>(&id)?;
    let (car, sha) = table_store(&state, &session)
        .update::<Car, _>(&id, request.expected_sha.as_deref(), |d| d.apply(&request))
        .await?;
    success(car, Some(sha))
}
