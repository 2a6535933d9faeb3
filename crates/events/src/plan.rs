//! Routing and rendering: event in, concrete deliveries out.
//!
//! Kept free of I/O so routing rules can be tested directly.

use brieflink_core::actor::ActorKind;
use brieflink_core::notification::NotificationKind;
use brieflink_db::models::notification::CreateNotification;

use crate::delivery::email::EmailMessage;
use crate::event::{NotificationEvent, ProjectRef, Recipient};

/// Maximum characters of a chat message quoted in a notification.
const PREVIEW_CHARS: usize = 140;

/// Subject prefix for every outbound email.
const SUBJECT_PREFIX: &str = "[Brieflink]";

/// One concrete side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    InApp(CreateNotification),
    Email(EmailMessage),
}

/// Human-readable content shared by both channels.
struct Rendered {
    kind: Option<NotificationKind>,
    title: String,
    message: String,
    /// Which side the link in the email should point to.
    audience: ActorKind,
}

/// Turn an event into the deliveries it calls for.
///
/// `base_url` is the public web origin used to build links in emails.
pub fn plan_deliveries(event: &NotificationEvent, base_url: &str) -> Vec<Delivery> {
    let project = event.project();
    let (recipient, rendered) = match event {
        NotificationEvent::StatusChanged {
            recipient, from, to, ..
        } => (
            recipient,
            Rendered {
                kind: Some(NotificationKind::StatusChanged),
                title: "Project status updated".to_string(),
                message: format!("'{}' moved from {from} to {to}.", project.title),
                audience: ActorKind::Respondent,
            },
        ),
        NotificationEvent::NewMessage {
            sender,
            owner,
            respondent,
            preview,
            ..
        } => {
            let (recipient, audience) = match sender.counterpart() {
                ActorKind::Owner => (owner, ActorKind::Owner),
                ActorKind::Respondent => (respondent, ActorKind::Respondent),
            };
            (
                recipient,
                Rendered {
                    kind: Some(NotificationKind::NewMessage),
                    title: format!("New message on '{}'", project.title),
                    message: truncate(preview, PREVIEW_CHARS),
                    audience,
                },
            )
        }
        NotificationEvent::RevisionRequested {
            recipient,
            step_key,
            question,
            ..
        } => (
            recipient,
            Rendered {
                kind: Some(NotificationKind::RevisionRequested),
                title: "A clarification was requested".to_string(),
                message: format!(
                    "About '{step_key}' in '{}': {}",
                    project.title,
                    truncate(question, PREVIEW_CHARS)
                ),
                audience: ActorKind::Respondent,
            },
        ),
        NotificationEvent::RevisionResponded {
            recipient, step_key, ..
        } => (
            recipient,
            Rendered {
                kind: Some(NotificationKind::RevisionResponse),
                title: "Revision request answered".to_string(),
                message: format!(
                    "The respondent answered your question about '{step_key}' in '{}'.",
                    project.title
                ),
                audience: ActorKind::Owner,
            },
        ),
        NotificationEvent::BriefSubmitted {
            recipient,
            answered_steps,
            total_steps,
            ..
        } => (
            recipient,
            Rendered {
                kind: Some(NotificationKind::BriefSubmitted),
                title: "Brief submitted".to_string(),
                message: format!(
                    "'{}' was submitted with {answered_steps} of {total_steps} steps answered.",
                    project.title
                ),
                audience: ActorKind::Owner,
            },
        ),
        NotificationEvent::SubmissionReceipt { recipient, .. } => (
            recipient,
            Rendered {
                kind: None,
                title: "We received your answers".to_string(),
                message: format!(
                    "Thank you. Your answers for '{}' were submitted successfully.",
                    project.title
                ),
                audience: ActorKind::Respondent,
            },
        ),
        NotificationEvent::DeliverablesReady {
            recipient,
            asset_count,
            note,
            ..
        } => {
            let mut message = format!(
                "{asset_count} deliverable(s) for '{}' are ready for review.",
                project.title
            );
            if let Some(note) = note.as_deref().filter(|n| !n.trim().is_empty()) {
                message.push_str("\n\n");
                message.push_str(note);
            }
            (
                recipient,
                Rendered {
                    kind: Some(NotificationKind::DeliverablesReady),
                    title: "Deliverables ready".to_string(),
                    message,
                    audience: ActorKind::Respondent,
                },
            )
        }
    };

    build(project, recipient, rendered, base_url)
}

fn build(
    project: &ProjectRef,
    recipient: &Recipient,
    rendered: Rendered,
    base_url: &str,
) -> Vec<Delivery> {
    let mut deliveries = Vec::with_capacity(2);

    if let (Some(kind), Some(user_id)) = (rendered.kind, recipient.user_id) {
        deliveries.push(Delivery::InApp(CreateNotification {
            recipient_id: user_id,
            kind,
            title: rendered.title.clone(),
            message: rendered.message.clone(),
            project_id: Some(project.id),
        }));
    }

    if let Some(email) = &recipient.email {
        let base = base_url.trim_end_matches('/');
        let link = match rendered.audience {
            ActorKind::Owner => format!("{base}/projects/{}", project.id),
            ActorKind::Respondent => format!("{base}/portal/projects/{}", project.id),
        };
        deliveries.push(Delivery::Email(EmailMessage {
            to: email.clone(),
            subject: format!("{SUBJECT_PREFIX} {}", rendered.title),
            body: format!("{}\n\nOpen the project: {link}\n", rendered.message),
        }));
    }

    deliveries
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
