//! Repository for the `revision_requests` table.

use brieflink_core::revision::RevisionStatus;
use brieflink_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::revision_request::{CreateRevisionRequest, RevisionRequest};

const COLUMNS: &str = "id, project_id, requester_id, step_key, field_key, message, status, \
     response, created_at, responded_at";

/// Provides the respond-once request lifecycle.
pub struct RevisionRequestRepo;

impl RevisionRequestRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateRevisionRequest,
    ) -> Result<RevisionRequest, sqlx::Error> {
        let mut tx = pool.begin().await?;

        // Serializes against `BriefRepo::regenerate`, which counts pending
        // requests while holding the project row.
        sqlx::query("SELECT 1 FROM projects WHERE id = $1 FOR SHARE")
            .bind(input.project_id)
            .execute(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO revision_requests (project_id, requester_id, step_key, field_key, message) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        let request = sqlx::query_as::<_, RevisionRequest>(&query)
            .bind(input.project_id)
            .bind(input.requester_id)
            .bind(&input.step_key)
            .bind(&input.field_key)
            .bind(&input.message)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Find a request, scoped to its project.
    pub async fn find(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<RevisionRequest>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM revision_requests WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, RevisionRequest>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Record the answer if the request is still pending.
    ///
    /// Returns `None` when the request does not exist in this project or has
    /// already been answered; the stored answer is never overwritten.
    pub async fn respond(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        response: &str,
        at: Timestamp,
    ) -> Result<Option<RevisionRequest>, sqlx::Error> {
        let query = format!(
            "UPDATE revision_requests SET status = $3, response = $4, responded_at = $5 \
             WHERE id = $1 AND project_id = $2 AND status = $6 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RevisionRequest>(&query)
            .bind(id)
            .bind(project_id)
            .bind(RevisionStatus::Responded.as_str())
            .bind(response)
            .bind(at)
            .bind(RevisionStatus::Pending.as_str())
            .fetch_optional(pool)
            .await
    }

    /// All requests of a project, oldest first.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<RevisionRequest>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM revision_requests WHERE project_id = $1 \
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, RevisionRequest>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    pub async fn count_pending(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar(
            "SELECT COUNT(*) FROM revision_requests WHERE project_id = $1 AND status = $2",
        )
        .bind(project_id)
        .bind(RevisionStatus::Pending.as_str())
        .fetch_one(pool)
        .await?;
        Ok(count.unwrap_or(0))
    }
}
