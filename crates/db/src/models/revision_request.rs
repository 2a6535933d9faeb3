//! Revision request model and DTOs.

use brieflink_core::revision::RevisionStatus;
use brieflink_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `revision_requests` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct RevisionRequest {
    pub id: DbId,
    pub project_id: DbId,
    pub requester_id: DbId,
    pub step_key: String,
    pub field_key: Option<String>,
    pub message: String,
    #[sqlx(try_from = "String")]
    pub status: RevisionStatus,
    pub response: Option<String>,
    pub created_at: Timestamp,
    pub responded_at: Option<Timestamp>,
}

/// DTO for opening a revision request.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateRevisionRequest {
    pub project_id: DbId,
    pub requester_id: DbId,
    pub step_key: String,
    pub field_key: Option<String>,
    pub message: String,
}
