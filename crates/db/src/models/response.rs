//! Questionnaire response model.

use brieflink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `responses` table. Unique per `(project_id, step_key)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Response {
    pub id: DbId,
    pub project_id: DbId,
    pub step_key: String,
    pub answers: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
