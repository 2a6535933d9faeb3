use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brieflink_core::types::DbId;
use brieflink_workflow::deliverables::NewAsset;
use brieflink_workflow::Deliverables;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::{AuthUser, Participant};
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DeliverablesReadyRequest {
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeliverablesReadyResponse {
    pub announced_assets: usize,
}

/// GET /api/v1/projects/{id}/assets
pub async fn list_assets(
    Participant(actor): Participant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let assets = Deliverables::list_assets(&state.workflow, &actor, id).await?;
    Ok(Json(DataResponse { data: assets }))
}

/// POST /api/v1/projects/{id}/assets
pub async fn add_asset(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<NewAsset>,
) -> AppResult<impl IntoResponse> {
    let asset = Deliverables::add_asset(&state.workflow, &auth.actor(), id, input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: asset })))
}

/// POST /api/v1/projects/{id}/deliverables-ready
pub async fn mark_ready(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<DeliverablesReadyRequest>,
) -> AppResult<impl IntoResponse> {
    let announced_assets =
        Deliverables::mark_ready(&state.workflow, &auth.actor(), id, body.note).await?;
    Ok(Json(DataResponse {
        data: DeliverablesReadyResponse { announced_assets },
    }))
}
