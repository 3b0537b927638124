//! Tender API endpoints.
//!
//! List rows carry the actions the client may offer, so an available,
//! unassigned tender shows up with `assign`.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{list_records, success, table_store, ApiResult};
use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{
    AssignTenderRequest, CreateTenderRequest, ListQuery, Tender, TenderRow, UpdateTenderRequest,
};
use crate::AppState;

/// GET /api/tenders - List tenders with their available actions.
pub async fn list_tenders(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<TenderRow>> {
    let store = table_store(&state, &session);
    let snapshot = list_records::<Tender>(&store, query.status.as_deref()).await?;
    let rows = snapshot.data.into_iter().map(TenderRow::from).collect();
    success(rows, snapshot.sha)
}

/// GET /api/tenders/:id - Get a single tender.
pub async fn get_tender(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> ApiResult<TenderRow> {
    let snapshot = table_store(&state, &session).get::<Tender>(&id).await?;
    let tender = snapshot
        .data
        .ok_or_else(|| AppError::NotFound(format!("Tender {} not found", id)))?;
    success(TenderRow::from(tender), snapshot.sha)
}

/// POST /api/tenders - Publish a tender. New tenders are available and unassigned.
pub async fn create_tender(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<CreateTenderRequest>,
) -> ApiResult<TenderRow> {
    request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (tender, sha) = table_store(&state, &session)
        .create::<Tender, _>(expected_sha.as_deref(), |id| Tender::from_request(id, request))
        .await?;
    success(TenderRow::from(tender), Some(sha))
}

/// PUT /api/tenders/:id - Update a tender.
pub async fn update_tender(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateTenderRequest>,
) -> ApiResult<TenderRow> {
    let (tender, sha) = table_store(&state, &session)
        .update::<Tender, _>(&id, request.expected_sha.as_deref(), |t| t.apply(&request))
        .await?;
    success(TenderRow::from(tender), Some(sha))
}

/// POST /api/tenders/:id/assign - Hand an available tender to a driver.
pub async fn assign_tender(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<AssignTenderRequest>,
) -> ApiResult<TenderRow> {
    let (tender, sha) = table_store(&state, &session)
        .update::<Tender, _>(&id, request.expected_sha.as_deref(), |t| {
            t.assign(&request.driver)
        })
        .await?;
    tracing::info!(tender = %tender.id, driver = %tender.driver, "tender assigned");
    success(TenderRow::from(tender), Some(sha))
}
