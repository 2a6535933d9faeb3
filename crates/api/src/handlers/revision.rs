//! Owner side of revision requests and revision cycles, plus the shared
//! listing.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brieflink_core::types::DbId;
use brieflink_workflow::revision::NewRevisionRequest;
use brieflink_workflow::RevisionWorkflow;

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, Participant};
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/revisions
pub async fn open_request(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<NewRevisionRequest>,
) -> AppResult<impl IntoResponse> {
    let request = RevisionWorkflow::open_request(&state.workflow, &auth.actor(), id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: request })))
}

/// GET /api/v1/projects/{id}/revisions
pub async fn list_requests(
    Participant(actor): Participant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let requests = RevisionWorkflow::list(&state.workflow, &actor, id).await?;
    Ok(Json(DataResponse { data: requests }))
}

/// POST /api/v1/projects/{id}/revision-cycle/start
pub async fn start_cycle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = RevisionWorkflow::start_cycle(&state.workflow, &auth.actor(), id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/projects/{id}/revision-cycle/complete
pub async fn complete_cycle(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let brief = RevisionWorkflow::complete_cycle(&state.workflow, &auth.actor(), id).await?;
    Ok(Json(DataResponse { data: brief }))
}
