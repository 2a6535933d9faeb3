//! Owner handlers for the `/projects` resource.
//!
//! Every endpoint requires an owner session ([`AuthUser`]). Projects the
//! caller does not own answer `404`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brieflink_core::lifecycle::{BlockerSeverity, Phase, ProjectStatus};
use brieflink_core::types::DbId;
use brieflink_workflow::lifecycle::NewProject;
use brieflink_workflow::{LifecycleEngine, ShareLinks, SubmissionPipeline};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ProjectStatus,
}

/// Body of `POST /projects/{id}/phase/advance`. Omit `target` to move one
/// phase forward.
#[derive(Debug, Default, Deserialize)]
pub struct AdvancePhaseRequest {
    #[serde(default)]
    pub target: Option<Phase>,
}

#[derive(Debug, Deserialize)]
pub struct AddBlockerRequest {
    pub description: String,
    pub severity: BlockerSeverity,
}

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
pub async fn list_projects(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let projects = LifecycleEngine::list_projects(&state.workflow, &auth.actor()).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// POST /api/v1/projects
///
/// Creates a `draft` project; the response carries its access token.
pub async fn create_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<NewProject>,
) -> AppResult<impl IntoResponse> {
    let detail = LifecycleEngine::create_project(&state.workflow, &auth.actor(), input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = LifecycleEngine::get_project(&state.workflow, &auth.actor(), id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete_project(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    LifecycleEngine::delete_project(&state.workflow, &auth.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Status and phase
// ---------------------------------------------------------------------------

/// PUT /api/v1/projects/{id}/status
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let project =
        LifecycleEngine::update_status(&state.workflow, &auth.actor(), id, body.status).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/phase/advance
pub async fn advance_phase(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<AdvancePhaseRequest>,
) -> AppResult<impl IntoResponse> {
    let lifecycle =
        LifecycleEngine::advance_phase(&state.workflow, &auth.actor(), id, body.target).await?;
    Ok(Json(DataResponse { data: lifecycle }))
}

/// POST /api/v1/projects/{id}/blockers
pub async fn add_blocker(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<AddBlockerRequest>,
) -> AppResult<impl IntoResponse> {
    let lifecycle = LifecycleEngine::add_blocker(
        &state.workflow,
        &auth.actor(),
        id,
        &body.description,
        body.severity,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: lifecycle })))
}

/// DELETE /api/v1/projects/{id}/blockers/{blocker_id}
pub async fn resolve_blocker(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((id, blocker_id)): Path<(DbId, String)>,
) -> AppResult<impl IntoResponse> {
    let lifecycle =
        LifecycleEngine::resolve_blocker(&state.workflow, &auth.actor(), id, &blocker_id).await?;
    Ok(Json(DataResponse { data: lifecycle }))
}

// ---------------------------------------------------------------------------
// Tokens and sharing
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/token/rotate
pub async fn rotate_token(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = LifecycleEngine::rotate_access_token(&state.workflow, &auth.actor(), id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// POST /api/v1/projects/{id}/share
pub async fn issue_share_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = ShareLinks::issue(&state.workflow, &auth.actor(), id).await?;
    Ok(Json(DataResponse { data: project }))
}

/// DELETE /api/v1/projects/{id}/share
pub async fn revoke_share_link(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ShareLinks::revoke(&state.workflow, &auth.actor(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/projects/{id}/brief
pub async fn get_brief(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let brief = SubmissionPipeline::get_brief(&state.workflow, &auth.actor(), id).await?;
    Ok(Json(DataResponse { data: brief }))
}
