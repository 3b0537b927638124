//! View loading and control wiring endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension,
};
use serde::Serialize;

use super::{success, table_store, ApiResult};
use crate::auth::Session;
use crate::views::{InitReport, ViewAction, ViewName, ViewState};
use crate::AppState;

/// Handlers triggered by one click.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub view: ViewName,
    pub element_id: String,
    pub handlers: Vec<ViewAction>,
}

/// GET /api/views/:view - Fragment plus loader data, or a diagnostic.
pub async fn load_view(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(name): Path<String>,
) -> ApiResult<ViewState> {
    let spec = state.views.spec(&name)?;
    let view = state.views.load(spec, &table_store(&state, &session)).await?;
    success(view, None)
}

/// POST /api/views/:view/init - Wire the view's controls for this session.
pub async fn init_view(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path(name): Path<String>,
) -> ApiResult<InitReport> {
    let spec = state.views.spec(&name)?;
    let report = session.wiring.lock().await.initialize(spec);
    success(report, None)
}

/// POST /api/views/:view/controls/:element - Simulate a click on a control.
pub async fn dispatch_control(
    State(state): State<AppState>,
    Extension(session): Extension<Arc<Session>>,
    Path((name, element_id)): Path<(String, String)>,
) -> ApiResult<DispatchResult> {
    let spec = state.views.spec(&name)?;
    let handlers = session.wiring.lock().await.dispatch(spec.name, &element_id);
    success(
        DispatchResult {
            view: spec.name,
            element_id,
            handlers,
        },
        None,
    )
}
