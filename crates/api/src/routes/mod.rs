pub mod health;
pub mod notification;
pub mod portal;
pub mod project;
pub mod shared;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects/...                  owner session (some reads open to the token holder)
/// /portal/projects/...           respondent magic token
/// /notifications/...             owner session
/// /shared/{share_token}          public, read-only
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/portal/projects", portal::router())
        .nest("/notifications", notification::router())
        .nest("/shared", shared::router())
}
