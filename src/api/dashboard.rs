//! Dashboard summary endpoint.

use std::sync::Arc;

use axum::{extract::State, Extension};

use super::{success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{Car, Card, DashboardSummary, Driver, Invoice, Tender, User};
use crate::AppState;

/// GET /api/dashboard - Status counts across the fleet tables.
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
) -> ApiResult<DashboardSummary> {
    let store = table_store(&state, &session);
    let (drivers, cars, cards, tenders, invoices, users) = tokio::try_join!(
        store.load::<Driver>(),
        store.load::<Car>(),
        store.load::<Card>(),
        store.load::<Tender>(),
        store.load::<Invoice>(),
        store.load::<User>(),
    )?;

    let summary = DashboardSummary::build(
        &drivers.data,
        &cars.data,
        &cards.data,
        &tenders.data,
        &invoices.data,
        &users.data,
    );
    success(summary, None)
}
