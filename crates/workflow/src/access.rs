//! Authorization of callers against a project.
//!
//! Role is checked first, without touching the store. Owners must own the
//! project; anything else is `NOT_FOUND` so existence does not leak.
//! Respondents must present the project's current access token; every
//! failure (no token, wrong token, unknown project, unsent project) is the
//! same `ACCESS_DENIED`.

use brieflink_core::access_token::{verify_token, TOKEN_LENGTH};
use brieflink_core::actor::ActorContext;
use brieflink_core::error::CoreError;
use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::types::DbId;
use brieflink_db::models::project::Project;

use crate::context::WorkflowContext;
use crate::lifecycle::LifecycleEngine;

/// Compared against when the project does not exist, so a miss costs the
/// same comparison as a wrong token.
const PLACEHOLDER_TOKEN: &str = "000000000000000000000000000000000000000000000000";

const _: () = assert!(PLACEHOLDER_TOKEN.len() == TOKEN_LENGTH);

/// Load a project the owner in `actor` owns.
pub async fn authorize_owner(
    ctx: &WorkflowContext,
    actor: &ActorContext,
    project_id: DbId,
) -> Result<Project, CoreError> {
    let owner_id = actor.require_owner()?;
    owned_project(ctx, owner_id, project_id).await
}

pub(crate) async fn owned_project(
    ctx: &WorkflowContext,
    owner_id: DbId,
    project_id: DbId,
) -> Result<Project, CoreError> {
    match ctx.store.find_project(project_id).await? {
        Some(project) if project.owner_id == owner_id => Ok(project),
        _ => Err(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        }),
    }
}

/// Verify the respondent's token and record the visit.
///
/// Returns the project as it stands after respondent activity was recorded.
pub async fn authorize_respondent(
    ctx: &WorkflowContext,
    actor: &ActorContext,
    project_id: DbId,
) -> Result<Project, CoreError> {
    let presented = actor.require_respondent()?;
    let project = ctx.store.find_project(project_id).await?;

    let stored = project
        .as_ref()
        .map_or(PLACEHOLDER_TOKEN, |p| p.access_token.as_str());
    let token_ok = verify_token(presented, Some(stored));

    let project = match project {
        Some(project) if token_ok && project.status != ProjectStatus::Draft => project,
        _ => {
            tracing::debug!(project_id, "Respondent access denied");
            return Err(CoreError::AccessDenied);
        }
    };

    LifecycleEngine::record_respondent_activity(ctx, project).await
}

/// Authorize either actor. Owners get owner rules, respondents token rules.
pub async fn authorize_participant(
    ctx: &WorkflowContext,
    actor: &ActorContext,
    project_id: DbId,
) -> Result<Project, CoreError> {
    match actor {
        ActorContext::Owner { .. } => authorize_owner(ctx, actor, project_id).await,
        ActorContext::Respondent { .. } => authorize_respondent(ctx, actor, project_id).await,
    }
}

/// Collapse any failure into what a respondent is allowed to see.
///
/// Idempotency guards and validation problems stay visible; everything
/// that could reveal whether some entity exists becomes `ACCESS_DENIED`.
pub(crate) fn mask_for_respondent(actor: &ActorContext, err: CoreError) -> CoreError {
    match (actor, err) {
        (ActorContext::Respondent { .. }, CoreError::NotFound { .. }) => CoreError::AccessDenied,
        (_, err) => err,
    }
}
