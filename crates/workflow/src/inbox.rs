//! The owner's in-app notification inbox.

use brieflink_core::actor::ActorContext;
use brieflink_core::error::CoreError;
use brieflink_core::notification::clamp_limit;
use brieflink_core::types::DbId;
use brieflink_db::models::notification::Notification;

use crate::context::WorkflowContext;

pub struct Inbox;

impl Inbox {
    pub async fn list(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        unread_only: bool,
        limit: Option<i64>,
    ) -> Result<Vec<Notification>, CoreError> {
        let user_id = actor.require_owner()?;
        Ok(ctx
            .store
            .list_notifications(user_id, unread_only, clamp_limit(limit))
            .await?)
    }

    pub async fn mark_read(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        notification_id: DbId,
    ) -> Result<(), CoreError> {
        let user_id = actor.require_owner()?;
        if ctx.store.mark_notification_read(user_id, notification_id).await? {
            Ok(())
        } else {
            Err(CoreError::NotFound {
                entity: "Notification",
                id: notification_id,
            })
        }
    }

    /// Returns how many notifications were marked.
    pub async fn mark_all_read(ctx: &WorkflowContext, actor: &ActorContext) -> Result<u64, CoreError> {
        let user_id = actor.require_owner()?;
        Ok(ctx.store.mark_all_notifications_read(user_id).await?)
    }
}
