//! Repository for the `messages` table.

use brieflink_core::types::DbId;
use sqlx::PgPool;

use crate::models::message::{CreateMessage, Message};

const COLUMNS: &str = "id, project_id, sender_kind, sender_id, body, metadata, created_at";

/// Append-only access to project chat.
pub struct MessageRepo;

impl MessageRepo {
    pub async fn create(pool: &PgPool, input: &CreateMessage) -> Result<Message, sqlx::Error> {
        let query = format!(
            "INSERT INTO messages (project_id, sender_kind, sender_id, body, metadata) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(input.project_id)
            .bind(input.sender_kind.as_str())
            .bind(input.sender_id)
            .bind(&input.body)
            .bind(&input.metadata)
            .fetch_one(pool)
            .await
    }

    /// Chronological message list for a project.
    pub async fn list_for_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM messages WHERE project_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
