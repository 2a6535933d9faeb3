//! Submission Pipeline: freeze the saved answers into the project's brief
//! exactly once.
//!
//! The status check up front turns the common repeat into an early
//! `ALREADY_SUBMITTED` without any write. Concurrent submissions are
//! settled by the store: the status compare-and-set and the
//! `uq_briefs_project` constraint let exactly one writer through.

use brieflink_core::actor::ActorContext;
use brieflink_core::brief::{assemble_brief, BriefHeader, RespondentIdentity};
use brieflink_core::error::CoreError;
use brieflink_core::types::{DbId, Timestamp};
use brieflink_db::models::brief::Brief;
use brieflink_db::models::project::Project;
use brieflink_db::store::UQ_BRIEFS_PROJECT;
use brieflink_events::NotificationEvent;

use crate::access::{authorize_participant, authorize_respondent, mask_for_respondent};
use crate::context::{owner_recipient, project_ref, respondent_recipient, WorkflowContext};
use crate::views::{BriefView, ProjectSummary};

pub struct SubmissionPipeline;

impl SubmissionPipeline {
    /// Declare the questionnaire complete.
    pub async fn submit(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<BriefView, CoreError> {
        let project = authorize_respondent(ctx, actor, project_id).await?;
        if project.status.is_submitted() {
            tracing::info!(project_id, "Repeat submission rejected");
            return Err(CoreError::AlreadySubmitted);
        }

        let now = ctx.now();
        let responses = ctx.store.list_responses(project.id).await?;
        let content = assemble_brief(
            header(&project, now),
            responses.into_iter().map(|r| (r.step_key, r.answers)),
        )?;

        let (project, brief) = match ctx.store.submit_brief(project.id, &content, now).await {
            Ok(Some(done)) => done,
            Ok(None) => {
                tracing::info!(project_id, "Submission lost race, project already submitted");
                return Err(CoreError::AlreadySubmitted);
            }
            Err(e) if e.is_unique_violation_of(UQ_BRIEFS_PROJECT) => {
                tracing::info!(project_id, "Submission hit existing brief");
                return Err(CoreError::AlreadySubmitted);
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(
            project_id,
            brief_id = brief.id,
            answered_steps = content.answered_steps,
            "Brief submitted"
        );

        ctx.notify(NotificationEvent::BriefSubmitted {
            project: project_ref(&project),
            recipient: owner_recipient(&project),
            answered_steps: content.answered_steps,
            total_steps: content.total_steps,
        });
        ctx.notify(NotificationEvent::SubmissionReceipt {
            project: project_ref(&project),
            recipient: respondent_recipient(&project),
        });

        Ok(BriefView {
            project: ProjectSummary::from(&project),
            brief,
        })
    }

    /// The current brief, for the owner or the token holder.
    pub async fn get_brief(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<BriefView, CoreError> {
        let project = authorize_participant(ctx, actor, project_id).await?;
        let brief = Self::find_brief(ctx, &project)
            .await
            .map_err(|e| mask_for_respondent(actor, e))?;
        Ok(BriefView {
            project: ProjectSummary::from(&project),
            brief,
        })
    }

    pub(crate) async fn find_brief(
        ctx: &WorkflowContext,
        project: &Project,
    ) -> Result<Brief, CoreError> {
        ctx.store
            .find_brief(project.id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Brief",
                id: project.id,
            })
    }
}

pub(crate) fn header(project: &Project, submitted_at: Timestamp) -> BriefHeader {
    BriefHeader {
        title: project.title.clone(),
        category: project.category,
        respondent: RespondentIdentity {
            email: project.respondent_email.clone(),
            account_id: project.respondent_account_id,
        },
        submitted_at,
    }
}
