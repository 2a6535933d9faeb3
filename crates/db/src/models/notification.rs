//! Notification entity model and DTOs.

use brieflink_core::notification::NotificationKind;
use brieflink_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notifications` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Notification {
    pub id: DbId,
    pub recipient_id: DbId,
    #[sqlx(try_from = "String")]
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub project_id: Option<DbId>,
    pub is_read: bool,
    pub read_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating an in-app notification.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateNotification {
    pub recipient_id: DbId,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub project_id: Option<DbId>,
}
