//! Repository for the `lifecycle_states` table.

use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::lifecycle::LifecycleState;
use crate::models::project::Project;
use crate::repositories::project_repo;

pub(crate) const COLUMNS: &str = "project_id, current_phase, completed_phases, blockers, \
     revision_cycles, lock_version, updated_at";

/// Provides access to the phase companion row of a project.
pub struct LifecycleRepo;

impl LifecycleRepo {
    pub async fn find(pool: &PgPool, project_id: DbId) -> Result<Option<LifecycleState>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lifecycle_states WHERE project_id = $1");
        sqlx::query_as::<_, LifecycleState>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Write `state` if its `lock_version` still matches the stored row.
    ///
    /// Returns the new row (with `lock_version` bumped) or `None` when
    /// another writer got there first.
    pub async fn update(
        pool: &PgPool,
        state: &LifecycleState,
        at: Timestamp,
    ) -> Result<Option<LifecycleState>, sqlx::Error> {
        let query = format!(
            "UPDATE lifecycle_states SET \
                current_phase = $3, \
                completed_phases = $4, \
                blockers = $5, \
                revision_cycles = $6, \
                lock_version = lock_version + 1, \
                updated_at = $7 \
             WHERE project_id = $1 AND lock_version = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LifecycleState>(&query)
            .bind(state.project_id)
            .bind(state.lock_version)
            .bind(state.current_phase.as_str())
            .bind(Json(&state.completed_phases))
            .bind(Json(&state.blockers))
            .bind(state.revision_cycles)
            .bind(at)
            .fetch_optional(pool)
            .await
    }

    /// Move a `completed` project back to `in_progress` and write the
    /// regressed lifecycle row, atomically.
    ///
    /// Returns `None` (and changes nothing) if the project is no longer
    /// `completed` or the lifecycle row moved underneath the caller.
    pub async fn reopen_for_revision(
        pool: &PgPool,
        state: &LifecycleState,
        at: Timestamp,
    ) -> Result<Option<(Project, LifecycleState)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET status = $2, completed_at = NULL, updated_at = $4 \
             WHERE id = $1 AND status = $3 \
             RETURNING {}",
            project_repo::COLUMNS
        );
        let Some(project) = sqlx::query_as::<_, Project>(&query)
            .bind(state.project_id)
            .bind(ProjectStatus::InProgress.as_str())
            .bind(ProjectStatus::Completed.as_str())
            .bind(at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "UPDATE lifecycle_states SET \
                current_phase = $3, \
                completed_phases = $4, \
                revision_cycles = $5, \
                lock_version = lock_version + 1, \
                updated_at = $6 \
             WHERE project_id = $1 AND lock_version = $2 \
             RETURNING {COLUMNS}"
        );
        let Some(lifecycle) = sqlx::query_as::<_, LifecycleState>(&query)
            .bind(state.project_id)
            .bind(state.lock_version)
            .bind(state.current_phase.as_str())
            .bind(Json(&state.completed_phases))
            .bind(state.revision_cycles)
            .bind(at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        tx.commit().await?;
        Ok(Some((project, lifecycle)))
    }
}
