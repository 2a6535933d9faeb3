//! Repository for the `responses` table.

use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::types::DbId;
use sqlx::PgPool;

use crate::models::response::Response;

const COLUMNS: &str = "id, project_id, step_key, answers, created_at, updated_at";

/// Provides upsert and listing for questionnaire responses.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Insert or replace the answers for `(project_id, step_key)`.
    ///
    /// The write only happens while the project still accepts respondent
    /// edits; otherwise `None` is returned and nothing is stored.
    pub async fn upsert(
        pool: &PgPool,
        project_id: DbId,
        step_key: &str,
        answers: &serde_json::Value,
    ) -> Result<Option<Response>, sqlx::Error> {
        let query = format!(
            "INSERT INTO responses (project_id, step_key, answers) \
             SELECT id, $2, $3 FROM projects WHERE id = $1 AND status IN ($4, $5) \
             ON CONFLICT ON CONSTRAINT uq_responses_project_step \
             DO UPDATE SET answers = EXCLUDED.answers, updated_at = NOW() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Response>(&query)
            .bind(project_id)
            .bind(step_key)
            .bind(answers)
            .bind(ProjectStatus::Sent.as_str())
            .bind(ProjectStatus::InProgress.as_str())
            .fetch_optional(pool)
            .await
    }

    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Response>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM responses WHERE project_id = $1 ORDER BY id");
        sqlx::query_as::<_, Response>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
