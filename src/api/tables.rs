//! Raw table access.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{success, table_store, ApiResult};
use crate::auth::Session;
use crate::errors::AppError;
use crate::store::Table;
use crate::AppState;

/// Request body for replacing a whole table.
#[derive(Debug, Deserialize)]
pub struct WriteTableRequest {
    pub data: Value,
    /// Sha the client read; omit only when creating the file.
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

fn parse_table(name: &str) -> Result<Table, AppError> {
    Table::parse(name).ok_or_else(|| AppError::NotFound(format!("Table {} not found", name)))
}

/// GET /api/tables/:table - Table contents and sha.
pub async fn read_table(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(name): Path<String>,
) -> ApiResult<Value> {
    let table = parse_table(&name)?;
    let snapshot = table_store(&state, &session).read(table).await?;
    success(snapshot.data, snapshot.sha)
}

/// PUT /api/tables/:table - Commit a new table value.
pub async fn write_table(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(name): Path<String>,
    Json(request): Json<WriteTableRequest>,
) -> ApiResult<Value> {
    let table = parse_table(&name)?;
    let message = request
        .message
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("Update {}", table.path()));

    let sha = table_store(&state, &session)
        .write(table, &request.data, &message, request.sha.as_deref())
        .await?;
    success(request.data, Some(sha))
}
