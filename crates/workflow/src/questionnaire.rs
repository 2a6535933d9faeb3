//! Respondent side of the questionnaire: opening the link and saving
//! answers step by step.

use brieflink_core::actor::ActorContext;
use brieflink_core::brief::Answers;
use brieflink_core::error::CoreError;
use brieflink_core::steps::{progress_percent, validate_step_key, STEP_KEYS};
use brieflink_core::types::DbId;
use brieflink_db::models::response::Response;

use crate::access::authorize_respondent;
use crate::context::WorkflowContext;
use crate::views::{ProjectSummary, QuestionnaireView};

pub struct Questionnaire;

impl Questionnaire {
    /// Verify the link, record the visit and return what was saved so far.
    pub async fn open(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
    ) -> Result<QuestionnaireView, CoreError> {
        let project = authorize_respondent(ctx, actor, project_id).await?;
        let responses = ctx.store.list_responses(project.id).await?;
        Ok(QuestionnaireView {
            project: ProjectSummary::from(&project),
            steps: STEP_KEYS,
            progress_percent: progress_percent(responses.len()),
            responses,
        })
    }

    /// Insert or replace the answers for one step.
    ///
    /// Allowed only while the project is `sent` or `in_progress`; once the
    /// brief has been submitted every save is `ALREADY_SUBMITTED`.
    pub async fn save_response(
        ctx: &WorkflowContext,
        actor: &ActorContext,
        project_id: DbId,
        step_key: &str,
        answers: serde_json::Value,
    ) -> Result<Response, CoreError> {
        actor.require_respondent()?;
        validate_step_key(step_key)?;
        let answers = Answers::from_value(step_key, answers)?;

        let project = authorize_respondent(ctx, actor, project_id).await?;
        if project.status.is_submitted() {
            tracing::info!(project_id, "Response save after submission rejected");
            return Err(CoreError::AlreadySubmitted);
        }

        let value = serde_json::to_value(&answers)
            .map_err(|e| CoreError::Internal(format!("answers did not serialize: {e}")))?;

        match ctx.store.upsert_response(project.id, step_key, &value).await? {
            Some(response) => {
                tracing::debug!(project_id, step_key, "Response saved");
                Ok(response)
            }
            None => {
                tracing::info!(project_id, step_key, "Response save lost race with submission");
                Err(CoreError::AlreadySubmitted)
            }
        }
    }
}
