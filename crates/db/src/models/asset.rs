//! Deliverable asset reference model and DTOs.

use brieflink_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `assets` table. The file itself lives in external storage.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub project_id: DbId,
    pub kind: String,
    pub storage_key: String,
    pub label: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for registering an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAsset {
    pub project_id: DbId,
    pub kind: String,
    pub storage_key: String,
    pub label: Option<String>,
}
