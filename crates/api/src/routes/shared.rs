use axum::routing::get;
use axum::Router;

use crate::handlers::shared;
use crate::state::AppState;

/// Routes mounted at `/shared`. No authentication.
pub fn router() -> Router<AppState> {
    Router::new().route("/{share_token}", get(shared::view_shared_brief))
}
