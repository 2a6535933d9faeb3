//! Revision Workflow: owner questions, one-time respondent answers, and
//! the revision cycle that reopens a submitted project.
//!
//! A cycle is explicit. The owner starts it (`completed → in_progress`,
//! phase regressed to `revision` if it was further along), asks any number
//! of questions, and completes it once nothing is pending, which writes a
//! new brief version that includes the answered questions.

use brieflink_core::actor::ActorContext;
use brieflink_core::brief::{assemble_brief, AnsweredRevision};
use brieflink_core::error::CoreError;
use brieflink_core::lifecycle::{revision_regression_target, ProjectStatus};
use brieflink_core::revision::{
    parse_request_id, validate_new_request, validate_response_text, RevisionStatus,
};
use brieflink_core::types::DbId;
use brieflink_db::models::brief::RegenerateOutcome;
use brieflink_db::models::revision_request::{CreateRevisionRequest, RevisionRequest};
use brieflink_events::NotificationEvent;
use serde::Deserialize;

use crate::access::{authorize_owner, authorize_participant, authorize_respondent};
use crate::context::{owner_recipient, project_ref, respondent_recipient, WorkflowContext};
use crate::lifecycle::LifecycleEngine;
use crate::submission::{header, SubmissionPipeline};
use crate::views::{BriefView, ProjectDetail, ProjectSummary};

/// Owner input for a new revision request.
#[derive(Debug, Clone, Deserialize)]
pub struct NewRevisionRequest {
    pub step_key: String,
    #[serde(default)]
    pub field_key: Option<String>,
    pub message: String,
}

pub struct RevisionWorkflow;

impl RevisionWorkflow {
    /// Raise a clarification question. Never changes the project status.
    pub async fn open_request(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        input: NewRevisionRequest,
    ) -> Result<RevisionRequest, CoreError> {
        let requester_id = actor.require_owner()?;
        let message = input.message.trim().to_string();
        let field_key = input
            .field_key
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty());
        validate_new_request(&input.step_key, field_key.as_deref(), &message)?;

        let project = authorize_owner(ctx, actor, project_id).await?;
        if project.status == ProjectStatus::Draft {
            return Err(CoreError::invalid_transition(project.status, "revision request"));
        }

        let request = ctx
            .store
            .create_revision_request(&CreateRevisionRequest {
                project_id: project.id,
                requester_id,
                step_key: input.step_key,
                field_key,
                message,
            })
            .await?;

        tracing::info!(
            project_id,
            request_id = request.id,
            step_key = %request.step_key,
            "Revision request opened"
        );
        ctx.notify(NotificationEvent::RevisionRequested {
            project: project_ref(&project),
            recipient: respondent_recipient(&project),
            step_key: request.step_key.clone(),
            question: request.message.clone(),
        });
        Ok(request)
    }

    /// Answer a pending request. A request is answered at most once.
    pub async fn respond(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        raw_request_id: &str,
        response: &str,
    ) -> Result<RevisionRequest, CoreError> {
        actor.require_respondent()?;
        let request_id = parse_request_id(raw_request_id)?;
        let response = response.trim();
        validate_response_text(response)?;

        let project = authorize_respondent(ctx, actor, project_id).await?;
        let existing = ctx
            .store
            .find_revision_request(project.id, request_id)
            .await?
            .ok_or(CoreError::AccessDenied)?;
        if existing.status == RevisionStatus::Responded {
            tracing::info!(project_id, request_id, "Repeat revision response rejected");
            return Err(CoreError::AlreadyResponded);
        }

        let Some(answered) = ctx
            .store
            .respond_revision_request(project.id, request_id, response, ctx.now())
            .await?
        else {
            tracing::info!(project_id, request_id, "Revision response lost race");
            return Err(CoreError::AlreadyResponded);
        };

        tracing::info!(project_id, request_id, "Revision request answered");
        ctx.notify(NotificationEvent::RevisionResponded {
            project: project_ref(&project),
            recipient: owner_recipient(&project),
            step_key: answered.step_key.clone(),
        });
        Ok(answered)
    }

    /// All requests of the project, for either party.
    pub async fn list(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<Vec<RevisionRequest>, CoreError> {
        let project = authorize_participant(ctx, actor, project_id).await?;
        Ok(ctx.store.list_revision_requests(project.id).await?)
    }

    /// Reopen a submitted project for another round of questions.
    pub async fn start_cycle(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<ProjectDetail, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        if project.status != ProjectStatus::Completed {
            return Err(CoreError::invalid_transition(
                project.status,
                ProjectStatus::InProgress,
            ));
        }

        let state = LifecycleEngine::lifecycle(ctx, project.id).await?;
        let mut next = state.clone();
        next.revision_cycles += 1;
        let regressed_to = revision_regression_target(state.current_phase);
        if let Some(target) = regressed_to {
            next.current_phase = target;
            next.completed_phases
                .retain(|c| c.phase.index() < target.index());
        }

        let Some((project, lifecycle)) = ctx.store.reopen_for_revision(&next, ctx.now()).await?
        else {
            let status = ctx
                .store
                .find_project(project_id)
                .await?
                .map_or(project.status, |p| p.status);
            return Err(CoreError::invalid_transition(status, ProjectStatus::InProgress));
        };

        match regressed_to {
            Some(target) => tracing::warn!(
                project_id,
                from = %state.current_phase,
                to = %target,
                cycle = lifecycle.revision_cycles,
                "Revision cycle started, phase regressed"
            ),
            None => tracing::info!(
                project_id,
                phase = %state.current_phase,
                cycle = lifecycle.revision_cycles,
                "Revision cycle started"
            ),
        }

        ctx.notify(NotificationEvent::StatusChanged {
            project: project_ref(&project),
            recipient: respondent_recipient(&project),
            from: ProjectStatus::Completed,
            to: ProjectStatus::InProgress,
        });

        let pending = ctx.store.count_pending_revision_requests(project.id).await?;
        Ok(ProjectDetail::new(project, lifecycle, pending, ctx.now()))
    }

    /// Close the cycle: back to `completed` with a regenerated brief.
    pub async fn complete_cycle(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<BriefView, CoreError> {
        let project = authorize_owner(ctx, actor, project_id).await?;
        if project.status != ProjectStatus::InProgress {
            return Err(CoreError::invalid_transition(
                project.status,
                ProjectStatus::Completed,
            ));
        }

        let brief = SubmissionPipeline::find_brief(ctx, &project).await?;

        let requests = ctx.store.list_revision_requests(project.id).await?;
        let pending = requests
            .iter()
            .filter(|r| r.status == RevisionStatus::Pending)
            .count();
        if pending > 0 {
            return Err(pending_requests_error(pending));
        }

        let now = ctx.now();
        let responses = ctx.store.list_responses(project.id).await?;
        let mut content = assemble_brief(
            header(&project, now),
            responses.into_iter().map(|r| (r.step_key, r.answers)),
        )?;
        content.revisions = requests.into_iter().filter_map(answered_revision).collect();

        let (project, brief) = match ctx
            .store
            .regenerate_brief(project.id, brief.version, &content, now)
            .await?
        {
            RegenerateOutcome::Regenerated { project, brief } => (project, brief),
            RegenerateOutcome::PendingRequests(count) => {
                tracing::info!(project_id, count, "Revision request opened while closing cycle");
                return Err(pending_requests_error(count));
            }
            RegenerateOutcome::Stale => {
                let status = ctx
                    .store
                    .find_project(project_id)
                    .await?
                    .map_or(ProjectStatus::InProgress, |p| p.status);
                return Err(CoreError::invalid_transition(status, ProjectStatus::Completed));
            }
        };

        tracing::info!(
            project_id,
            version = brief.version,
            revisions = content.revisions.len(),
            "Revision cycle completed, brief regenerated"
        );
        ctx.notify(NotificationEvent::StatusChanged {
            project: project_ref(&project),
            recipient: respondent_recipient(&project),
            from: ProjectStatus::InProgress,
            to: ProjectStatus::Completed,
        });

        Ok(BriefView {
            project: ProjectSummary::from(&project),
            brief,
        })
    }
}

fn pending_requests_error(count: impl std::fmt::Display) -> CoreError {
    CoreError::Validation(format!("{count} revision request(s) still awaiting a response"))
}

fn answered_revision(request: RevisionRequest) -> Option<AnsweredRevision> {
    Some(AnsweredRevision {
        request_id: request.id,
        responded_at: request.responded_at?,
        response: request.response?,
        step_key: request.step_key,
        field_key: request.field_key,
        question: request.message,
    })
}
