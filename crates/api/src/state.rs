use std::sync::Arc;

use brieflink_workflow::WorkflowContext;

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone: everything inside is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Record store and notification dispatcher.
    pub workflow: WorkflowContext,
    pub config: Arc<ServerConfig>,
}
