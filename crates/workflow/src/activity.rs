//! Chat between owner and respondent, surfaced as a typed activity feed.

use brieflink_core::activity::{validate_message_body, MessageMetadata};
use brieflink_core::actor::ActorContext;
use brieflink_core::error::CoreError;
use brieflink_core::types::DbId;
use brieflink_db::models::message::CreateMessage;
use brieflink_events::NotificationEvent;

use crate::access::authorize_participant;
use crate::context::{owner_recipient, project_ref, respondent_recipient, WorkflowContext};
use crate::views::ActivityEntry;

pub struct ActivityFeed;

impl ActivityFeed {
    /// Append a message and notify the other side.
    pub async fn send_message(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        body: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<ActivityEntry, CoreError> {
        validate_message_body(body)?;
        let metadata = metadata
            .filter(|m| !m.is_null())
            .map(|m| {
                let parsed: MessageMetadata = serde_json::from_value(m.clone())
                    .map_err(|e| CoreError::Validation(format!("Invalid message metadata: {e}")))?;
                parsed.validate()?;
                Ok::<_, CoreError>(m)
            })
            .transpose()?;

        let project = authorize_participant(ctx, actor, project_id).await?;
        let sender_id = match actor {
            ActorContext::Owner { user_id, .. } => Some(*user_id),
            ActorContext::Respondent { .. } => project.respondent_account_id,
        };

        let message = ctx
            .store
            .create_message(&CreateMessage {
                project_id: project.id,
                sender_kind: actor.kind(),
                sender_id,
                body: body.to_string(),
                metadata,
            })
            .await?;

        tracing::debug!(
            project_id,
            message_id = message.id,
            sender = %actor.kind(),
            "Message sent"
        );
        ctx.notify(NotificationEvent::NewMessage {
            project: project_ref(&project),
            sender: actor.kind(),
            owner: owner_recipient(&project),
            respondent: respondent_recipient(&project),
            preview: message.body.clone(),
        });
        Ok(ActivityEntry::from(message))
    }

    /// The project's messages in chronological order.
    pub async fn list(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Vec<ActivityEntry>, CoreError> {
        let project = authorize_participant(ctx, actor, project_id).await?;
        let messages = ctx.store.list_messages(project.id).await?;
        Ok(messages.into_iter().map(ActivityEntry::from).collect())
    }
}
