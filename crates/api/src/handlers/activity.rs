//! Project chat, open to both the owner and the token holder.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brieflink_core::types::DbId;
use brieflink_workflow::ActivityFeed;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::Participant;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub body: String,
    /// Optional `{ "action": ..., "feedback_tags": [...] }`.
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

/// GET /api/v1/projects/{id}/messages
pub async fn list_messages(
    Participant(actor): Participant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let feed = ActivityFeed::list(&state.workflow, &actor, id).await?;
    Ok(Json(DataResponse { data: feed }))
}

/// POST /api/v1/projects/{id}/messages
pub async fn send_message(
    Participant(actor): Participant,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(body): Json<SendMessageRequest>,
) -> AppResult<impl IntoResponse> {
    let entry =
        ActivityFeed::send_message(&state.workflow, &actor, id, &body.body, body.metadata).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}
