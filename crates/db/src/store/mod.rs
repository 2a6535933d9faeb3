//! The record store seam.
//!
//! Workflow code never talks to a pool directly; it holds an
//! `Arc<dyn RecordStore>`. [`PgStore`] backs production, [`MemoryStore`]
//! backs tests and local runs and enforces the same uniqueness, compare-and-set
//! and cascade rules.

use async_trait::async_trait;
use brieflink_core::brief::BriefContent;
use brieflink_core::error::CoreError;
use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::types::{DbId, Timestamp};

use crate::models::asset::{Asset, CreateAsset};
use crate::models::brief::{Brief, RegenerateOutcome};
use crate::models::lifecycle::LifecycleState;
use crate::models::message::{CreateMessage, Message};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::project::{CreateProject, Project};
use crate::models::response::Response;
use crate::models::revision_request::{CreateRevisionRequest, RevisionRequest};

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Constraint guarding "one brief per project".
pub const UQ_BRIEFS_PROJECT: &str = "uq_briefs_project";

/// Constraint guarding "one response row per step".
pub const UQ_RESPONSES_PROJECT_STEP: &str = "uq_responses_project_step";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Record store failure: {0}")]
    Backend(String),
}

impl StoreError {
    /// `true` if this is a violation of the named unique constraint.
    pub fn is_unique_violation_of(&self, name: &str) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or_default().to_string(),
                };
            }
        }
        tracing::error!(error = %err, "Database error");
        StoreError::Backend(err.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        CoreError::Storage(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Transactional query/command interface over every persisted entity.
///
/// Commands that return `Option` use `None` for "the guarded precondition
/// no longer held"; the caller turns that into the right domain error.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // -- Projects --

    /// Insert a `draft` project and its lifecycle row in one transaction.
    async fn create_project(&self, input: &CreateProject) -> StoreResult<(Project, LifecycleState)>;

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>>;

    async fn find_project_by_share_token(&self, share_token: &str) -> StoreResult<Option<Project>>;

    async fn list_projects_for_owner(&self, owner_id: DbId) -> StoreResult<Vec<Project>>;

    /// Compare-and-set the status; `None` if it is no longer `expected`.
    async fn transition_status(
        &self,
        id: DbId,
        expected: ProjectStatus,
        next: ProjectStatus,
        at: Timestamp,
    ) -> StoreResult<Option<Project>>;

    /// Stamp `last_accessed_at`.
    async fn touch_project(&self, id: DbId, at: Timestamp) -> StoreResult<()>;

    async fn set_share_token(
        &self,
        id: DbId,
        share_token: Option<&str>,
    ) -> StoreResult<Option<Project>>;

    async fn set_access_token(&self, id: DbId, access_token: &str) -> StoreResult<Option<Project>>;

    /// Delete the project and every dependent row. `false` if it was absent.
    async fn delete_project(&self, id: DbId) -> StoreResult<bool>;

    // -- Lifecycle --

    async fn find_lifecycle(&self, project_id: DbId) -> StoreResult<Option<LifecycleState>>;

    /// Optimistic write keyed on `state.lock_version`.
    async fn update_lifecycle(
        &self,
        state: &LifecycleState,
        at: Timestamp,
    ) -> StoreResult<Option<LifecycleState>>;

    /// `completed → in_progress` plus the regressed lifecycle row, atomically.
    async fn reopen_for_revision(
        &self,
        state: &LifecycleState,
        at: Timestamp,
    ) -> StoreResult<Option<(Project, LifecycleState)>>;

    // -- Responses --

    /// Upsert by `(project_id, step_key)`; `None` if the project no longer
    /// accepts edits.
    async fn upsert_response(
        &self,
        project_id: DbId,
        step_key: &str,
        answers: &serde_json::Value,
    ) -> StoreResult<Option<Response>>;

    async fn list_responses(&self, project_id: DbId) -> StoreResult<Vec<Response>>;

    // -- Briefs --

    /// Move to `completed` and insert the first brief; `None` if the project
    /// was already past `in_progress`.
    async fn submit_brief(
        &self,
        project_id: DbId,
        content: &BriefContent,
        at: Timestamp,
    ) -> StoreResult<Option<(Project, Brief)>>;

    /// Move `in_progress → completed` and bump the brief version, provided
    /// no revision request is pending at that moment.
    async fn regenerate_brief(
        &self,
        project_id: DbId,
        expected_version: i32,
        content: &BriefContent,
        at: Timestamp,
    ) -> StoreResult<RegenerateOutcome>;

    async fn find_brief(&self, project_id: DbId) -> StoreResult<Option<Brief>>;

    // -- Revision requests --

    async fn create_revision_request(
        &self,
        input: &CreateRevisionRequest,
    ) -> StoreResult<RevisionRequest>;

    async fn find_revision_request(
        &self,
        project_id: DbId,
        id: DbId,
    ) -> StoreResult<Option<RevisionRequest>>;

    /// Answer a pending request; `None` if it is not pending any more.
    async fn respond_revision_request(
        &self,
        project_id: DbId,
        id: DbId,
        response: &str,
        at: Timestamp,
    ) -> StoreResult<Option<RevisionRequest>>;

    async fn list_revision_requests(&self, project_id: DbId) -> StoreResult<Vec<RevisionRequest>>;

    async fn count_pending_revision_requests(&self, project_id: DbId) -> StoreResult<i64>;

    // -- Messages --

    async fn create_message(&self, input: &CreateMessage) -> StoreResult<Message>;

    async fn list_messages(&self, project_id: DbId) -> StoreResult<Vec<Message>>;

    // -- Assets --

    async fn create_asset(&self, input: &CreateAsset) -> StoreResult<Asset>;

    async fn list_assets(&self, project_id: DbId) -> StoreResult<Vec<Asset>>;

    // -- Notifications --

    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification>;

    async fn list_notifications(
        &self,
        recipient_id: DbId,
        unread_only: bool,
        limit: i64,
    ) -> StoreResult<Vec<Notification>>;

    async fn mark_notification_read(&self, recipient_id: DbId, id: DbId) -> StoreResult<bool>;

    async fn mark_all_notifications_read(&self, recipient_id: DbId) -> StoreResult<u64>;

    // -- Health --

    async fn ping(&self) -> StoreResult<()>;
}
