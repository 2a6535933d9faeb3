use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use brieflink_workflow::ShareLinks;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/shared/{share_token}
///
/// Public, read-only view of a submitted brief.
pub async fn view_shared_brief(
    State(state): State<AppState>,
    Path(share_token): Path<String>,
) -> AppResult<impl IntoResponse> {
    let brief = ShareLinks::view(&state.workflow, &share_token).await?;
    Ok(Json(DataResponse { data: brief }))
}
