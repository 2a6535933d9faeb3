//! Read-only share links for finished briefs.
//!
//! The share token is generated independently of the respondent token and
//! only ever unlocks [`ShareLinks::view`]. There is no write path behind it.

use brieflink_core::access_token::{generate_token, verify_token};
use brieflink_core::actor::ActorContext;
use brieflink_core::error::CoreError;
use brieflink_core::types::DbId;
use brieflink_db::models::project::Project;

use crate::access::authorize_owner;
use crate::context::WorkflowContext;
use crate::views::{BriefView, ProjectSummary};

pub struct ShareLinks;

impl ShareLinks {
    /// Return the project's share token, creating one if needed.
    ///
    /// Only submitted projects have something to share.
    pub async fn issue(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Project, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        if !project.status.is_submitted() {
            return Err(CoreError::invalid_transition(project.status, "shared"));
        }
        if project.share_token.is_some() {
            return Ok(project);
        }

        let updated = ctx
            .store
            .set_share_token(project.id, Some(&generate_token()))
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;
        tracing::info!(project_id, "Share link issued");
        Ok(updated)
    }

    /// Invalidate the share link. Idempotent.
    pub async fn revoke(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Project, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        let updated = ctx
            .store
            .set_share_token(project.id, None)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;
        tracing::info!(project_id, "Share link revoked");
        Ok(updated)
    }

    /// Public read of a shared brief. Every failure is `ACCESS_DENIED`.
    pub async fn view(ctx: &WorkflowContext, share_token: &str) -> Result<BriefView, CoreError> {
        if share_token.trim().is_empty() {
            return Err(CoreError::AccessDenied);
        }

        let Some(project) = ctx.store.find_project_by_share_token(share_token).await? else {
            tracing::debug!("Unknown share token presented");
            return Err(CoreError::AccessDenied);
        };
        if !verify_token(Some(share_token), project.share_token.as_deref())
            || !project.status.is_submitted()
        {
            return Err(CoreError::AccessDenied);
        }

        let brief = ctx
            .store
            .find_brief(project.id)
            .await?
            .ok_or(CoreError::AccessDenied)?;
        Ok(BriefView {
            project: ProjectSummary::from(&project),
            brief,
        })
    }
}
