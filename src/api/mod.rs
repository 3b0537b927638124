//! REST API module.
//!
//! Every protected handler receives the caller's session as an extension
//! and talks to the session's repository through a [`TableStore`].

mod cards;
mod cars;
mod chat;
mod dashboard;
mod drivers;
mod invoices;
mod session;
mod statuses;
mod tables;
mod tenders;
mod users;
mod views;

pub use cards::*;
pub use cars::*;
pub use chat::*;
pub use dashboard::*;
pub use drivers::*;
pub use invoices::*;
pub use session::*;
pub use statuses::*;
pub use tables::*;
pub use tenders::*;
pub use users::*;
pub use views::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::auth::Session;
use crate::errors::AppError;
use crate::models::{filter_by_status, Record, StatusRecord};
use crate::store::{Snapshot, TableStore};
use crate::AppState;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
    /// Sha of the table the data came from, for the client's next write.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T, sha: Option<String>) -> Self {
        Self {
            success: true,
            data,
            sha,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T, sha: Option<String>) -> ApiResult<T> {
    Ok(ApiResponse::new(data, sha))
}

fn table_store(state: &AppState, session: &Session) -> TableStore {
    session.store(state.github.clone())
}

/// Shared list handler body: load a table and apply the status filter.
async fn list_records<R: StatusRecord>(
    store: &TableStore,
    status: Option<&str>,
) -> Result<Snapshot<Vec<R>>, AppError> {
    let Snapshot { data, sha } = store.load::<R>().await?;
    Ok(Snapshot {
        data: filter_by_status(data, status)?,
        sha,
    })
}

/// Parse a numeric id taken from the request path.
fn numeric_id<R: Record<Id = u64>>(raw: &str) -> Result<u64, AppError> {
    raw.trim().parse().map_err(|_| {
        AppError::Validation(format!(
            "{:?} is not a valid {} id",
            raw,
            R::TABLE.record_noun()
        ))
    })
}

/// Shared get handler body.
async fn find_record<R: Record>(store: &TableStore, id: &R::Id) -> ApiResult<R> {
    let Snapshot { data, sha } = store.get::<R>(id).await?;
    match data {
        Some(record) => success(record, sha),
        None => Err(AppError::NotFound(format!(
            "{} {} not found",
            R::TABLE.record_noun(),
            id
        ))),
    }
}
