//! Lifecycle state (phase companion row) model.

use brieflink_core::lifecycle::{Blocker, CompletedPhase, Phase};
use brieflink_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `lifecycle_states` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LifecycleState {
    pub project_id: DbId,
    #[sqlx(try_from = "String")]
    pub current_phase: Phase,
    #[sqlx(json)]
    pub completed_phases: Vec<CompletedPhase>,
    #[sqlx(json)]
    pub blockers: Vec<Blocker>,
    pub revision_cycles: i32,
    /// Optimistic-lock counter; bumped by every successful update.
    #[serde(skip)]
    pub lock_version: i32,
    pub updated_at: Timestamp,
}
