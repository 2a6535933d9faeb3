//! Chat message model and DTOs.

use brieflink_core::actor::ActorKind;
use brieflink_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `messages` table. Append-only.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Message {
    pub id: DbId,
    pub project_id: DbId,
    #[sqlx(try_from = "String")]
    pub sender_kind: ActorKind,
    pub sender_id: Option<DbId>,
    pub body: String,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Timestamp,
}

/// DTO for appending a message.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateMessage {
    pub project_id: DbId,
    pub sender_kind: ActorKind,
    pub sender_id: Option<DbId>,
    pub body: String,
    pub metadata: Option<serde_json::Value>,
}
