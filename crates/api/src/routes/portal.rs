//! Route definitions for the respondent portal.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::portal;
use crate::state::AppState;

/// Routes mounted at `/portal/projects`. All require a magic token.
///
/// ```text
/// GET    /{id}                                    -> open_questionnaire
/// PUT    /{id}/responses/{step_key}               -> save_response
/// POST   /{id}/submit                             -> submit
/// GET    /{id}/brief                              -> get_brief
/// POST   /{id}/revisions/{request_id}/respond     -> respond_to_revision
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(portal::open_questionnaire))
        .route("/{id}/responses/{step_key}", put(portal::save_response))
        .route("/{id}/submit", post(portal::submit))
        .route("/{id}/brief", get(portal::get_brief))
        .route(
            "/{id}/revisions/{request_id}/respond",
            post(portal::respond_to_revision),
        )
}
