//! Serializable read models returned by workflow operations.
//!
//! Anything a respondent or a share-link visitor can see is built from
//! [`ProjectSummary`], which carries no secrets.

use brieflink_core::activity::{classify_message, ActivityKind};
use brieflink_core::actor::ActorKind;
use brieflink_core::lifecycle::{
    compute_health_score, phase_implied_by_status, HealthSignals, Phase, ProjectStatus,
};
use brieflink_core::project::ProjectCategory;
use brieflink_core::types::{DbId, Timestamp};
use brieflink_db::models::brief::Brief;
use brieflink_db::models::lifecycle::LifecycleState;
use brieflink_db::models::message::Message;
use brieflink_db::models::project::Project;
use brieflink_db::models::response::Response;
use serde::Serialize;

/// Project facts safe to show to any party.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub title: String,
    pub category: ProjectCategory,
    pub status: ProjectStatus,
    pub sent_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

impl From<&Project> for ProjectSummary {
    fn from(p: &Project) -> Self {
        Self {
            id: p.id,
            title: p.title.clone(),
            category: p.category,
            status: p.status,
            sent_at: p.sent_at,
            completed_at: p.completed_at,
        }
    }
}

/// The owner's view of a project: the full row, its lifecycle and the
/// derived, advisory signals.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub lifecycle: LifecycleState,
    pub health_score: u8,
    pub implied_phase: Option<Phase>,
    pub pending_revisions: i64,
}

impl ProjectDetail {
    pub fn new(
        project: Project,
        lifecycle: LifecycleState,
        pending_revisions: i64,
        now: Timestamp,
    ) -> Self {
        let health_score = compute_health_score(
            &HealthSignals {
                status: project.status,
                current_phase: lifecycle.current_phase,
                blockers: &lifecycle.blockers,
                pending_revisions: usize::try_from(pending_revisions).unwrap_or(0),
                last_accessed_at: project.last_accessed_at,
                sent_at: project.sent_at,
            },
            now,
        );
        Self {
            implied_phase: phase_implied_by_status(project.status),
            project,
            lifecycle,
            health_score,
            pending_revisions,
        }
    }
}

/// What the respondent sees when opening the link.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionnaireView {
    pub project: ProjectSummary,
    pub steps: &'static [&'static str],
    pub progress_percent: u8,
    pub responses: Vec<Response>,
}

/// A brief together with the project it belongs to.
#[derive(Debug, Clone, Serialize)]
pub struct BriefView {
    pub project: ProjectSummary,
    pub brief: Brief,
}

/// One entry of the typed activity feed.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub kind: ActivityKind,
    pub sender_kind: ActorKind,
    pub sender_id: Option<DbId>,
    pub body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub feedback_tags: Vec<String>,
    pub created_at: Timestamp,
}

impl From<Message> for ActivityEntry {
    fn from(m: Message) -> Self {
        let (kind, feedback_tags) = classify_message(m.metadata.as_ref());
        Self {
            id: m.id,
            kind,
            sender_kind: m.sender_kind,
            sender_id: m.sender_id,
            body: m.body,
            feedback_tags,
            created_at: m.created_at,
        }
    }
}
