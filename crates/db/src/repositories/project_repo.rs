//! Repository for the `projects` table.

use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::lifecycle::LifecycleState;
use crate::models::project::{CreateProject, Project};
use crate::repositories::lifecycle_repo;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str = "id, owner_id, owner_email, title, category, \
     respondent_email, respondent_account_id, status, access_token, share_token, \
     last_accessed_at, sent_at, completed_at, created_at, updated_at";

/// Dependent tables in the order their rows are removed on project deletion.
const CASCADE_ORDER: &[&str] = &[
    "notifications",
    "messages",
    "assets",
    "revision_requests",
    "briefs",
    "responses",
    "lifecycle_states",
];

/// Provides commands and queries for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new `draft` project together with its lifecycle row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProject,
    ) -> Result<(Project, LifecycleState), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (owner_id, owner_email, title, category, respondent_email, \
                                   respondent_account_id, access_token) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(input.owner_id)
            .bind(&input.owner_email)
            .bind(&input.title)
            .bind(input.category.as_str())
            .bind(&input.respondent_email)
            .bind(input.respondent_account_id)
            .bind(&input.access_token)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO lifecycle_states (project_id) VALUES ($1) RETURNING {}",
            lifecycle_repo::COLUMNS
        );
        let lifecycle = sqlx::query_as::<_, LifecycleState>(&query)
            .bind(project.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((project, lifecycle))
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the project a share token belongs to.
    pub async fn find_by_share_token(
        pool: &PgPool,
        share_token: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE share_token = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(share_token)
            .fetch_optional(pool)
            .await
    }

    /// List an owner's projects, most recently created first.
    pub async fn list_for_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Compare-and-set the status.
    ///
    /// Returns `None` when the row is no longer in `expected`. `sent_at` is
    /// stamped on the move to `sent`; `completed_at` is kept while the status
    /// stays submitted and cleared otherwise.
    pub async fn transition_status(
        pool: &PgPool,
        id: DbId,
        expected: ProjectStatus,
        next: ProjectStatus,
        at: Timestamp,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET \
                status = $3, \
                sent_at = CASE WHEN $3 = 'sent' THEN $5 ELSE sent_at END, \
                completed_at = CASE WHEN $4 THEN COALESCE(completed_at, $5) ELSE NULL END, \
                updated_at = $5 \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(next.as_str())
            .bind(next.is_submitted())
            .bind(at)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `last_accessed_at`.
    pub async fn touch(pool: &PgPool, id: DbId, at: Timestamp) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE projects SET last_accessed_at = $2 WHERE id = $1")
            .bind(id)
            .bind(at)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Set or clear the share token.
    pub async fn set_share_token(
        pool: &PgPool,
        id: DbId,
        share_token: Option<&str>,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET share_token = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(share_token)
            .fetch_optional(pool)
            .await
    }

    /// Replace the respondent access token.
    pub async fn set_access_token(
        pool: &PgPool,
        id: DbId,
        access_token: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET access_token = $2, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(access_token)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and every dependent row in one transaction.
    ///
    /// Returns `true` if the project existed.
    pub async fn delete_cascade(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        for table in CASCADE_ORDER {
            let query = format!("DELETE FROM {table} WHERE project_id = $1");
            sqlx::query(&query).bind(id).execute(&mut *tx).await?;
        }

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}
