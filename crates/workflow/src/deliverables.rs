//! Deliverable asset references and the "ready for review" announcement.
//!
//! Files live in external storage; only their keys are recorded here.

use brieflink_core::actor::ActorContext;
use brieflink_core::error::CoreError;
use brieflink_core::types::DbId;
use brieflink_db::models::asset::{Asset, CreateAsset};
use brieflink_events::NotificationEvent;
use serde::Deserialize;

use crate::access::{authorize_owner, authorize_participant};
use crate::context::{project_ref, respondent_recipient, WorkflowContext};

const MAX_KIND_LENGTH: usize = 50;
const MAX_STORAGE_KEY_LENGTH: usize = 500;
const MAX_LABEL_LENGTH: usize = 200;
const MAX_NOTE_LENGTH: usize = 2_000;

/// Owner input for registering an asset.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAsset {
    pub kind: String,
    pub storage_key: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl NewAsset {
    fn validate(&self) -> Result<(), CoreError> {
        bounded("Asset kind", &self.kind, MAX_KIND_LENGTH)?;
        bounded("Storage key", &self.storage_key, MAX_STORAGE_KEY_LENGTH)?;
        if let Some(label) = &self.label {
            bounded("Asset label", label, MAX_LABEL_LENGTH)?;
        }
        Ok(())
    }
}

fn bounded(field: &str, value: &str, max: usize) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be empty")));
    }
    if value.chars().count() > max {
        return Err(CoreError::Validation(format!(
            "{field} exceeds {max} characters"
        )));
    }
    Ok(())
}

pub struct Deliverables;

impl Deliverables {
    pub async fn add_asset(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        input: NewAsset,
    ) -> Result<Asset, CoreError> {
        actor.require_owner()?;
        input.validate()?;
        let project = authorize_owner(ctx, actor, project_id).await?;

        let asset = ctx
            .store
            .create_asset(&CreateAsset {
                project_id: project.id,
                kind: input.kind.trim().to_string(),
                storage_key: input.storage_key,
                label: input.label,
            })
            .await?;
        tracing::info!(project_id, asset_id = asset.id, kind = %asset.kind, "Asset registered");
        Ok(asset)
    }

    pub async fn list_assets(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Vec<Asset>, CoreError> {
        let project = authorize_participant(ctx, actor, project_id).await?;
        Ok(ctx.store.list_assets(project.id).await?)
    }

    /// Tell the respondent the deliverables can be reviewed. Requires at
    /// least one registered asset. Returns the number of assets announced.
    pub async fn mark_ready(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        note: Option<String>,
    ) -> Result<usize, CoreError> {
        actor.require_owner()?;
        if let Some(note) = &note {
            if note.chars().count() > MAX_NOTE_LENGTH {
                return Err(CoreError::Validation(format!(
                    "Note exceeds {MAX_NOTE_LENGTH} characters"
                )));
            }
        }
        let project = authorize_owner(ctx, actor, project_id).await?;

        let asset_count = ctx.store.list_assets(project.id).await?.len();
        if asset_count == 0 {
            return Err(CoreError::Validation(
                "Register at least one deliverable before announcing it".to_string(),
            ));
        }

        tracing::info!(project_id, asset_count, "Deliverables announced");
        ctx.notify(NotificationEvent::DeliverablesReady {
            project: project_ref(&project),
            recipient: respondent_recipient(&project),
            asset_count,
            note,
        });
        Ok(asset_count)
    }
}
