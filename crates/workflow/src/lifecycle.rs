//! Lifecycle Engine: project creation, status transitions, phase moves,
//! blockers, token rotation and deletion.
//!
//! Every mutation re-reads the project, validates the requested edge
//! against the state machine, and then writes with a compare-and-set on
//! the status (or `lock_version` for the lifecycle row). A lost race is
//! reported, never overwritten.

use brieflink_core::access_token::generate_token;
use brieflink_core::actor::ActorContext;
use brieflink_core::error::CoreError;
use brieflink_core::lifecycle::{
    plan_phase_advance, validate_status_transition, Blocker, BlockerSeverity, Phase,
    ProjectStatus,
};
use brieflink_core::project::{validate_email, validate_title, ProjectCategory};
use brieflink_core::types::DbId;
use brieflink_db::models::lifecycle::LifecycleState;
use brieflink_db::models::project::{CreateProject, Project};
use brieflink_events::NotificationEvent;
use serde::Deserialize;

use crate::access::authorize_owner;
use crate::context::{project_ref, respondent_recipient, WorkflowContext};
use crate::views::ProjectDetail;

/// How often a commutative lifecycle edit (blockers) is retried after
/// losing an optimistic-lock race.
const MAX_LOCK_RETRIES: usize = 3;

/// Owner input for a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub category: ProjectCategory,
    pub respondent_email: String,
    #[serde(default)]
    pub respondent_account_id: Option<DbId>,
}

/// Status, phase and housekeeping operations.
pub struct LifecycleEngine;

impl LifecycleEngine {
    // -- Projects --

    /// Create a `draft` project with a fresh access token.
    pub async fn create_project(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        input: NewProject,
    ) -> Result<ProjectDetail, CoreError> {
        let owner_id = actor.require_owner()?;
        let title = input.title.trim().to_string();
        validate_title(&title)?;
        let respondent_email = input.respondent_email.trim().to_lowercase();
        validate_email(&respondent_email)?;

        let owner_email = match actor {
            ActorContext::Owner { email, .. } => email.clone(),
            ActorContext::Respondent { .. } => None,
        };

        let (project, lifecycle) = ctx
            .store
            .create_project(&CreateProject {
                owner_id,
                owner_email,
                title,
                category: input.category,
                respondent_email,
                respondent_account_id: input.respondent_account_id,
                access_token: generate_token(),
            })
            .await?;

        tracing::info!(project_id = project.id, owner_id, "Project created");
        Ok(ProjectDetail::new(project, lifecycle, 0, ctx.now()))
    }

    pub async fn list_projects(
        ctx: &WorkflowContext,
        actor: &ActorContext,
    ) -> Result<Vec<ProjectDetail>, CoreError> {
        let owner_id = actor.require_owner()?;
        let projects = ctx.store.list_projects_for_owner(owner_id).await?;

        let mut details = Vec::with_capacity(projects.len());
        for project in projects {
            details.push(Self::detail(ctx, project).await?);
        }
        Ok(details)
    }

    pub async fn get_project(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<ProjectDetail, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        Self::detail(ctx, project).await
    }

    /// Delete the project and everything hanging off it. Irreversible.
    pub async fn delete_project(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<(), CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        if !ctx.store.delete_project(project.id).await? {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            });
        }
        tracing::info!(project_id, "Project deleted with all dependent records");
        Ok(())
    }

    // -- Status --

    /// `draft → sent`.
    pub async fn mark_sent(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Project, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        Self::transition(ctx, project, ProjectStatus::Sent).await
    }

    /// `completed → reviewed`. Repeating it on a reviewed project is a no-op.
    pub async fn mark_reviewed(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Project, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        if project.status == ProjectStatus::Reviewed {
            return Ok(project);
        }
        Self::transition(ctx, project, ProjectStatus::Reviewed).await
    }

    /// Generic owner status change. Only `sent` and `reviewed` can be
    /// requested directly; every other edge belongs to a specific workflow.
    pub async fn update_status(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        requested: ProjectStatus,
    ) -> Result<Project, CoreError> {
        match requested {
            ProjectStatus::Sent => Self::mark_sent(ctx, actor, project_id).await,
            ProjectStatus::Reviewed => Self::mark_reviewed(ctx, actor, project_id).await,
            other => {
                let project = authorize_owner(ctx, actor, project_id).await?;
                Err(CoreError::invalid_transition(project.status, other))
            }
        }
    }

    /// `sent → in_progress` on first contact, plus `last_accessed_at` on
    /// every contact.
    pub async fn record_respondent_activity(
        ctx: &WorkflowContext,
        project: Project,
    ) -> Result<Project, CoreError> {
        let now = ctx.now();
        ctx.store.touch_project(project.id, now).await?;

        if project.status != ProjectStatus::Sent {
            return Ok(Project {
                last_accessed_at: Some(now),
                ..project
            });
        }

        let moved = ctx
            .store
            .transition_status(project.id, ProjectStatus::Sent, ProjectStatus::InProgress, now)
            .await?;
        match moved {
            Some(project) => {
                tracing::info!(project_id = project.id, "Respondent started the questionnaire");
                Ok(project)
            }
            // Someone else moved it first; report what is there now.
            None => ctx
                .store
                .find_project(project.id)
                .await?
                .ok_or(CoreError::AccessDenied),
        }
    }

    /// Validate and apply an owner-driven status edge, then notify the
    /// respondent.
    async fn transition(
        ctx: &WorkflowContext,
        project: Project,
        next: ProjectStatus,
    ) -> Result<Project, CoreError> {
        let current = project.status;
        validate_status_transition(current, next)?;

        let updated = ctx
            .store
            .transition_status(project.id, current, next, ctx.now())
            .await?;
        let Some(updated) = updated else {
            let now_status = ctx
                .store
                .find_project(project.id)
                .await?
                .map_or(current, |p| p.status);
            return Err(CoreError::invalid_transition(now_status, next));
        };

        tracing::info!(
            project_id = updated.id,
            from = %current,
            to = %next,
            "Project status changed"
        );
        ctx.notify(NotificationEvent::StatusChanged {
            project: project_ref(&updated),
            recipient: respondent_recipient(&updated),
            from: current,
            to: next,
        });
        Ok(updated)
    }

    // -- Phase --

    /// Move the phase forward, to `target` or to the next phase.
    pub async fn advance_phase(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        target: Option<Phase>,
    ) -> Result<LifecycleState, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        let state = Self::lifecycle(ctx, project.id).await?;
        let now = ctx.now();

        let advance = plan_phase_advance(state.current_phase, target, now)?;
        let mut next = state.clone();
        next.current_phase = advance.to;
        next.completed_phases.extend(advance.completed);

        let Some(written) = ctx.store.update_lifecycle(&next, now).await? else {
            let current = Self::lifecycle(ctx, project.id).await?.current_phase;
            return Err(CoreError::invalid_transition(current, advance.to));
        };

        tracing::info!(
            project_id,
            from = %advance.from,
            to = %advance.to,
            "Project phase advanced"
        );
        Ok(written)
    }

    // -- Blockers --

    pub async fn add_blocker(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        description: &str,
        severity: BlockerSeverity,
    ) -> Result<LifecycleState, CoreError> {
        let blocker = Blocker::new(description, severity, ctx.now())?;
        let project = authorize_owner(ctx, actor, project_id).await?;

        let state = Self::edit_lifecycle(ctx, project.id, |state| {
            state.blockers.push(blocker.clone());
            Ok(())
        })
        .await?;
        tracing::info!(project_id, blocker_id = %blocker.id, severity = %severity, "Blocker added");
        Ok(state)
    }

    pub async fn resolve_blocker(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        blocker_id: &str,
    ) -> Result<LifecycleState, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;

        let state = Self::edit_lifecycle(ctx, project.id, |state| {
            let before = state.blockers.len();
            state.blockers.retain(|b| b.id != blocker_id);
            if state.blockers.len() == before {
                return Err(CoreError::Validation(format!(
                    "Unknown blocker '{blocker_id}'"
                )));
            }
            Ok(())
        })
        .await?;
        tracing::info!(project_id, blocker_id, "Blocker resolved");
        Ok(state)
    }

    // -- Tokens --

    /// Replace the respondent access token. The old link stops working
    /// immediately.
    pub async fn rotate_access_token(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Project, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        let updated = ctx
            .store
            .set_access_token(project.id, &generate_token())
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?;
        tracing::info!(project_id, "Respondent access token rotated");
        Ok(updated)
    }

    // -- Helpers --

    pub(crate) async fn lifecycle(
        ctx: &WorkflowContext,
        project_id: DbId,
    ) -> Result<LifecycleState, CoreError> {
        ctx.store
            .find_lifecycle(project_id)
            .await?
            .ok_or_else(|| CoreError::Internal(format!("project {project_id} has no lifecycle row")))
    }

    pub(crate) async fn detail(
        ctx: &WorkflowContext,
        project: Project,
    ) -> Result<ProjectDetail, CoreError> {
        let lifecycle = Self::lifecycle(ctx, project.id).await?;
        let pending = ctx.store.count_pending_revision_requests(project.id).await?;
        Ok(ProjectDetail::new(project, lifecycle, pending, ctx.now()))
    }

    /// Apply an order-independent edit, re-reading and retrying when another
    /// writer bumped `lock_version` in between.
    async fn edit_lifecycle<F>(
        ctx: &WorkflowContext,
        project_id: DbId,
        mut edit: F,
    ) -> Result<LifecycleState, CoreError>
    where
        F: FnMut(&mut LifecycleState) -> Result<(), CoreError>,
    {
        for _ in 0..MAX_LOCK_RETRIES {
            let mut state = Self::lifecycle(ctx, project_id).await?;
            edit(&mut state)?;
            if let Some(written) = ctx.store.update_lifecycle(&state, ctx.now()).await? {
                return Ok(written);
            }
            tracing::debug!(project_id, "Lifecycle write lost a race, retrying");
        }
        Err(CoreError::Internal(format!(
            "lifecycle of project {project_id} is under heavy contention"
        )))
    }
}
