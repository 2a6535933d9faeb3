//! Respondent handlers under `/portal/projects`.
//!
//! Callers are identified only by their magic token. Every access failure
//! renders the same generic `403`.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use brieflink_core::types::DbId;
use brieflink_workflow::{Questionnaire, RevisionWorkflow, SubmissionPipeline};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::MagicToken;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SaveResponseRequest {
    pub answers: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct RespondRequest {
    pub response: String,
}

/// GET /api/v1/portal/projects/{id}
///
/// Opens the questionnaire and returns the answers saved so far.
pub async fn open_questionnaire(
    token: MagicToken,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = Questionnaire::open(&state.workflow, &token.actor(), id).await?;
    Ok(Json(DataResponse { data: view }))
}

/// PUT /api/v1/portal/projects/{id}/responses/{step_key}
pub async fn save_response(
    token: MagicToken,
    State(state): State<AppState>,
    Path((id, step_key)): Path<(DbId, String)>,
    Json(body): Json<SaveResponseRequest>,
) -> AppResult<impl IntoResponse> {
    let response =
        Questionnaire::save_response(&state.workflow, &token.actor(), id, &step_key, body.answers)
            .await?;
    Ok(Json(DataResponse { data: response }))
}

/// POST /api/v1/portal/projects/{id}/submit
pub async fn submit(
    token: MagicToken,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let brief = SubmissionPipeline::submit(&state.workflow, &token.actor(), id).await?;
    Ok(Json(DataResponse { data: brief }))
}

/// GET /api/v1/portal/projects/{id}/brief
pub async fn get_brief(
    token: MagicToken,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let brief = SubmissionPipeline::get_brief(&state.workflow, &token.actor(), id).await?;
    Ok(Json(DataResponse { data: brief }))
}

/// POST /api/v1/portal/projects/{id}/revisions/{request_id}/respond
///
/// The request id stays a raw string so malformed ids are reported as
/// validation failures by the workflow.
pub async fn respond_to_revision(
    token: MagicToken,
    State(state): State<AppState>,
    Path((id, request_id)): Path<(DbId, String)>,
    Json(body): Json<RespondRequest>,
) -> AppResult<impl IntoResponse> {
    let request = RevisionWorkflow::respond(
        &state.workflow,
        &token.actor(),
        id,
        &request_id,
        &body.response,
    )
    .await?;
    Ok(Json(DataResponse { data: request }))
}
