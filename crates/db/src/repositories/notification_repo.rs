//! Repository for the `notifications` table.

use brieflink_core::types::DbId;
use sqlx::PgPool;

use crate::models::notification::{CreateNotification, Notification};

/// Column list for `notifications` queries.
const COLUMNS: &str =
    "id, recipient_id, kind, title, message, project_id, is_read, read_at, created_at";

/// Provides CRUD operations for notifications.
pub struct NotificationRepo;

impl NotificationRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateNotification,
    ) -> Result<Notification, sqlx::Error> {
        let query = format!(
            "INSERT INTO notifications (recipient_id, kind, title, message, project_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(input.recipient_id)
            .bind(input.kind.as_str())
            .bind(&input.title)
            .bind(&input.message)
            .bind(input.project_id)
            .fetch_one(pool)
            .await
    }

    /// List notifications for a recipient, newest first.
    ///
    /// When `unread_only` is `true`, only notifications with `is_read = false`
    /// are returned.
    pub async fn list_for_recipient(
        pool: &PgPool,
        recipient_id: DbId,
        unread_only: bool,
        limit: i64,
    ) -> Result<Vec<Notification>, sqlx::Error> {
        let filter = if unread_only {
            "AND is_read = false"
        } else {
            ""
        };
        let query = format!(
            "SELECT {COLUMNS} FROM notifications \
             WHERE recipient_id = $1 {filter} \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, Notification>(&query)
            .bind(recipient_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Mark a single notification as read.
    ///
    /// Returns `true` if the notification belongs to the recipient and was
    /// unread.
    pub async fn mark_read(
        pool: &PgPool,
        recipient_id: DbId,
        notification_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE id = $1 AND recipient_id = $2 AND is_read = false",
        )
        .bind(notification_id)
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark all unread notifications as read. Returns how many changed.
    pub async fn mark_all_read(pool: &PgPool, recipient_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notifications \
             SET is_read = true, read_at = NOW() \
             WHERE recipient_id = $1 AND is_read = false",
        )
        .bind(recipient_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
