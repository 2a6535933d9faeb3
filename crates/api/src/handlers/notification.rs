//! Handlers for the owner's `/notifications` inbox.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use brieflink_core::types::DbId;
use brieflink_workflow::Inbox;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for `GET /notifications`.
#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    /// Only unread notifications. Defaults to `false`.
    #[serde(default)]
    pub unread_only: bool,
    /// Page size. Defaults to 50, clamped to 1..=200.
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct MarkedRead {
    pub marked_read: u64,
}

/// GET /api/v1/notifications
pub async fn list_notifications(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<NotificationQuery>,
) -> AppResult<impl IntoResponse> {
    let notifications =
        Inbox::list(&state.workflow, &auth.actor(), params.unread_only, params.limit).await?;
    Ok(Json(DataResponse { data: notifications }))
}

/// POST /api/v1/notifications/{id}/read
///
/// `204` on success, `404` if the notification is not the caller's or was
/// already read.
pub async fn mark_read(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(notification_id): Path<DbId>,
) -> AppResult<StatusCode> {
    Inbox::mark_read(&state.workflow, &auth.actor(), notification_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/notifications/read-all
pub async fn mark_all_read(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let marked_read = Inbox::mark_all_read(&state.workflow, &auth.actor()).await?;
    Ok(Json(DataResponse { data: MarkedRead { marked_read } }))
}
