//! Invoice API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{find_record, list_records, numeric_id, success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{CreateInvoiceRequest, Invoice, ListQuery, UpdateInvoiceRequest};
use crate::AppState;

/// GET /api/invoices - List invoices, optionally filtered by status.
pub async fn list_invoices(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Invoice>> {
    let store = table_store(&state, &session);
    let snapshot = list_records::<Invoice>(&store, query.status.as_deref()).await?;
    success(snapshot.data, snapshot.sha)
}

/// GET /api/invoices/:id - Get a single invoice.
pub async fn get_invoice(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> ApiResult<Invoice> {
    let id = numeric_id::<Invoice>(&id)?;
    find_record::<Invoice>(&table_store(&state, &session), &id).await
}

/// POST /api/invoices - Issue an invoice.
pub async fn create_invoice(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<CreateInvoiceRequest>,
) -> ApiResult<Invoice> {
    request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (invoice, sha) = table_store(&state, &session)
        .create::<Invoice, _>(expected_sha.as_deref(), |id| Invoice::from_request(id, request))
        .await?;
    success(invoice, Some(sha))
}

/// PUT /api/invoices/:id - Update an invoice.
pub async fn update_invoice(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateInvoiceRequest>,
) -> ApiResult<Invoice> {
    let id = numeric_id::<Invoice>(&id)?;
    let (invoice, sha) = table_store(&state, &session)
        .update::<Invoice, _>(&id, request.expected_sha.as_deref(), |d| d.apply(&request))
        .await?;
    success(invoice, Some(sha))
}
