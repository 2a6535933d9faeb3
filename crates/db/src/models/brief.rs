//! Brief (assembled document) model.

use brieflink_core::brief::BriefContent;
use brieflink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::project::Project;

/// A row from the `briefs` table. At most one per project.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Brief {
    pub id: DbId,
    pub project_id: DbId,
    pub version: i32,
    #[sqlx(json)]
    pub content: BriefContent,
    pub artifact_ref: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Result of closing a revision cycle.
#[derive(Debug)]
pub enum RegenerateOutcome {
    /// Project is `completed` again and the brief carries the next version.
    Regenerated { project: Project, brief: Brief },
    /// Requests still awaiting an answer when the project row was locked.
    /// Nothing was written.
    PendingRequests(i64),
    /// The project left `in_progress` or the brief moved past the expected
    /// version.
    Stale,
}
