//! Repository for the `briefs` table.
//!
//! Both write paths are transactions that pair the brief write with the
//! project's status change, so "status says submitted" and "a brief exists"
//! can never disagree.

use brieflink_core::brief::{BriefContent, INITIAL_BRIEF_VERSION};
use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::revision::RevisionStatus;
use brieflink_core::types::{DbId, Timestamp};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::brief::{Brief, RegenerateOutcome};
use crate::models::project::Project;
use crate::repositories::project_repo;

const COLUMNS: &str = "id, project_id, version, content, artifact_ref, created_at, updated_at";

/// Provides submission, regeneration and lookup of briefs.
pub struct BriefRepo;

impl BriefRepo {
    pub async fn find_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Option<Brief>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM briefs WHERE project_id = $1");
        sqlx::query_as::<_, Brief>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Flip the project to `completed` and insert its first brief.
    ///
    /// Returns `None` if the project was not in `sent`/`in_progress` when the
    /// row lock was taken. A concurrent winner that slipped past the status
    /// check surfaces as a `uq_briefs_project` unique violation.
    pub async fn submit(
        pool: &PgPool,
        project_id: DbId,
        content: &BriefContent,
        at: Timestamp,
    ) -> Result<Option<(Project, Brief)>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET status = $2, completed_at = $5, updated_at = $5 \
             WHERE id = $1 AND status IN ($3, $4) \
             RETURNING {}",
            project_repo::COLUMNS
        );
        let Some(project) = sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .bind(ProjectStatus::Completed.as_str())
            .bind(ProjectStatus::Sent.as_str())
            .bind(ProjectStatus::InProgress.as_str())
            .bind(at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        let query = format!(
            "INSERT INTO briefs (project_id, version, content, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $4) \
             RETURNING {COLUMNS}"
        );
        let brief = sqlx::query_as::<_, Brief>(&query)
            .bind(project_id)
            .bind(INITIAL_BRIEF_VERSION)
            .bind(Json(content))
            .bind(at)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some((project, brief)))
    }

    /// Close a revision cycle: `in_progress → completed` plus a new brief
    /// version, atomically.
    ///
    /// Pending revision requests are counted inside the transaction, after
    /// the project row is locked.
    pub async fn regenerate(
        pool: &PgPool,
        project_id: DbId,
        expected_version: i32,
        content: &BriefContent,
        at: Timestamp,
    ) -> Result<RegenerateOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE projects SET status = $2, completed_at = $4, updated_at = $4 \
             WHERE id = $1 AND status = $3 \
             RETURNING {}",
            project_repo::COLUMNS
        );
        let Some(project) = sqlx::query_as::<_, Project>(&query)
            .bind(project_id)
            .bind(ProjectStatus::Completed.as_str())
            .bind(ProjectStatus::InProgress.as_str())
            .bind(at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(RegenerateOutcome::Stale);
        };

        // The project row is locked from here on; request inserts take a
        // share lock on it, so this count cannot miss one.
        let pending: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM revision_requests WHERE project_id = $1 AND status = $2",
        )
        .bind(project_id)
        .bind(RevisionStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;
        let pending = pending.unwrap_or(0);
        if pending > 0 {
            tx.rollback().await?;
            return Ok(RegenerateOutcome::PendingRequests(pending));
        }

        let query = format!(
            "UPDATE briefs SET version = version + 1, content = $3, artifact_ref = NULL, \
                               updated_at = $4 \
             WHERE project_id = $1 AND version = $2 \
             RETURNING {COLUMNS}"
        );
        let Some(brief) = sqlx::query_as::<_, Brief>(&query)
            .bind(project_id)
            .bind(expected_version)
            .bind(Json(content))
            .bind(at)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(RegenerateOutcome::Stale);
        };

        tx.commit().await?;
        Ok(RegenerateOutcome::Regenerated { project, brief })
    }
}
