//! Route definitions for the `/projects` resource.

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::handlers::{activity, deliverables, project, revision};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                  -> list_projects
/// POST   /                                  -> create_project
/// GET    /{id}                              -> get_project
/// DELETE /{id}                              -> delete_project
/// PUT    /{id}/status                       -> update_status
/// POST   /{id}/phase/advance                -> advance_phase
/// POST   /{id}/blockers                     -> add_blocker
/// DELETE /{id}/blockers/{blocker_id}        -> resolve_blocker
/// POST   /{id}/token/rotate                 -> rotate_token
/// POST   /{id}/share                        -> issue_share_link
/// DELETE /{id}/share                        -> revoke_share_link
/// GET    /{id}/brief                        -> get_brief
///
/// GET    /{id}/revisions                    -> list_requests    (owner or token)
/// POST   /{id}/revisions                    -> open_request
/// POST   /{id}/revision-cycle/start         -> start_cycle
/// POST   /{id}/revision-cycle/complete      -> complete_cycle
///
/// GET    /{id}/messages                     -> list_messages    (owner or token)
/// POST   /{id}/messages                     -> send_message     (owner or token)
///
/// GET    /{id}/assets                       -> list_assets      (owner or token)
/// POST   /{id}/assets                       -> add_asset
/// POST   /{id}/deliverables-ready           -> mark_ready
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list_projects).post(project::create_project))
        .route(
            "/{id}",
            get(project::get_project).delete(project::delete_project),
        )
        .route("/{id}/status", put(project::update_status))
        .route("/{id}/phase/advance", post(project::advance_phase))
        .route("/{id}/blockers", post(project::add_blocker))
        .route("/{id}/blockers/{blocker_id}", delete(project::resolve_blocker))
        .route("/{id}/token/rotate", post(project::rotate_token))
        .route(
            "/{id}/share",
            post(project::issue_share_link).delete(project::revoke_share_link),
        )
        .route("/{id}/brief", get(project::get_brief))
        // Revisions
        .route(
            "/{id}/revisions",
            get(revision::list_requests).post(revision::open_request),
        )
        .route("/{id}/revision-cycle/start", post(revision::start_cycle))
        .route("/{id}/revision-cycle/complete", post(revision::complete_cycle))
        // Activity
        .route(
            "/{id}/messages",
            get(activity::list_messages).post(activity::send_message),
        )
        // Deliverables
        .route(
            "/{id}/assets",
            get(deliverables::list_assets).post(deliverables::add_asset),
        )
        .route("/{id}/deliverables-ready", post(deliverables::mark_ready))
}
