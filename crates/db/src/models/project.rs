//! Project entity model and DTOs.

use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::project::ProjectCategory;
use brieflink_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// Carries both secrets; only owner-facing surfaces may serialize it as-is.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub owner_email: Option<String>,
    pub title: String,
    #[sqlx(try_from = "String")]
    pub category: ProjectCategory,
    pub respondent_email: String,
    pub respondent_account_id: Option<DbId>,
    #[sqlx(try_from = "String")]
    pub status: ProjectStatus,
    pub access_token: String,
    pub share_token: Option<String>,
    pub last_accessed_at: Option<Timestamp>,
    pub sent_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project. Status always starts at `draft`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub owner_id: DbId,
    pub owner_email: Option<String>,
    pub title: String,
    pub category: ProjectCategory,
    pub respondent_email: String,
    pub respondent_account_id: Option<DbId>,
    pub access_token: String,
}
