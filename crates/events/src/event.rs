//! The notification event union.

use brieflink_core::actor::ActorKind;
use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::types::DbId;
use serde::Serialize;

/// Where a notification can reach someone.
///
/// In-app records need a `user_id`; email needs an `email`. A recipient
/// with neither is silently skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub user_id: Option<DbId>,
    pub email: Option<String>,
}

impl Recipient {
    pub fn new(user_id: Option<DbId>, email: Option<String>) -> Self {
        Self { user_id, email }
    }
}

/// The project an event is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRef {
    pub id: DbId,
    pub title: String,
}

/// A domain event worth notifying someone about.
///
/// Each variant carries only addressing data and a short summary; the
/// authoritative state is whatever the triggering operation committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum NotificationEvent {
    /// Owner-driven status changes, addressed to the respondent.
    StatusChanged {
        project: ProjectRef,
        recipient: Recipient,
        from: ProjectStatus,
        to: ProjectStatus,
    },
    /// Routed to the counterpart of `sender`, never to the sender.
    NewMessage {
        project: ProjectRef,
        sender: ActorKind,
        owner: Recipient,
        respondent: Recipient,
        preview: String,
    },
    RevisionRequested {
        project: ProjectRef,
        recipient: Recipient,
        step_key: String,
        question: String,
    },
    RevisionResponded {
        project: ProjectRef,
        recipient: Recipient,
        step_key: String,
    },
    BriefSubmitted {
        project: ProjectRef,
        recipient: Recipient,
        answered_steps: usize,
        total_steps: usize,
    },
    /// Confirmation sent to the respondent after submission.
    SubmissionReceipt {
        project: ProjectRef,
        recipient: Recipient,
    },
    DeliverablesReady {
        project: ProjectRef,
        recipient: Recipient,
        asset_count: usize,
        note: Option<String>,
    },
}

impl NotificationEvent {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            NotificationEvent::StatusChanged { .. } => "statusChanged",
            NotificationEvent::NewMessage { .. } => "newMessage",
            NotificationEvent::RevisionRequested { .. } => "revisionRequested",
            NotificationEvent::RevisionResponded { .. } => "revisionResponded",
            NotificationEvent::BriefSubmitted { .. } => "briefSubmitted",
            NotificationEvent::SubmissionReceipt { .. } => "submissionReceipt",
            NotificationEvent::DeliverablesReady { .. } => "deliverablesReady",
        }
    }

    pub fn project(&self) -> &ProjectRef {
        match self {
            NotificationEvent::StatusChanged { project, .. }
            | NotificationEvent::NewMessage { project, .. }
            | NotificationEvent::RevisionRequested { project, .. }
            | NotificationEvent::RevisionResponded { project, .. }
            | NotificationEvent::BriefSubmitted { project, .. }
            | NotificationEvent::SubmissionReceipt { project, .. }
            | NotificationEvent::DeliverablesReady { project, .. } => project,
        }
    }
}
