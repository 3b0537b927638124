//! Fuel card API endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};

use super::{find_record, list_records, numeric_id, success, table_store, ApiResult};
use crate::auth::Session;
use crate::models::{Card, CreateCardRequest, ListQuery, UpdateCardRequest};
use crate::AppState;

/// GET /api/cards - List fuel cards, optionally filtered by status.
pub async fn list_cards(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<Card>> {
    let store = table_store(&state, &session);
    let snapshot = list_records::<Card>(&store, query.status.as_deref()).await?;
    success(snapshot.data, snapshot.sha)
}

/// GET /api/cards/:id - Get a single card.
pub async fn get_card(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
) -> ApiResult<Card> {
    let id = numeric_id::<Card>(&id)?;
    find_record::<Card>(&table_store(&state, &session), &id).await
}

/// POST /api/cards - Register a card. Only the last four digits are stored.
pub async fn create_card(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Json(request): Json<CreateCardRequest>,
) -> ApiResult<Card> {
    let masked = request.validate()?;
    let expected_sha = request.expected_sha.clone();

    let (card, sha) = table_store(&state, &session)
        .create::<Card, _>(expected_sha.as_deref(), |id| {
            Card::from_request(id, request, masked)
        })
        .await?;
    success(card, Some(sha))
}

/// PUT /api/cards/:id - Update a card.
pub async fn update_card(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(id): Path<String>,
    Json(request): Json<UpdateCardRequest>,
) -> ApiResult<Card> {
    let id = numeric_id::<Card>(&id)?;
    let (card, sha) = table_store(&state, &session)
        .update::<Card, _>(&id, request.expected_sha.as_deref(), |c| c.apply(&request))
        .await?;
    success(card, Some(sha))
}
