//! Shared dependencies of every workflow operation.

use std::sync::Arc;

use brieflink_core::types::Timestamp;
use brieflink_db::models::project::Project;
use brieflink_db::store::RecordStore;
use brieflink_events::{NotificationDispatcher, NotificationEvent, ProjectRef, Recipient};
use chrono::Utc;

/// Record store plus notification dispatcher. Cheap to clone.
#[derive(Clone)]
pub struct WorkflowContext {
    pub store: Arc<dyn RecordStore>,
    pub dispatcher: Arc<NotificationDispatcher>,
}

impl WorkflowContext {
    pub fn new(store: Arc<dyn RecordStore>, dispatcher: Arc<NotificationDispatcher>) -> Self {
        Self { store, dispatcher }
    }

    pub(crate) fn now(&self) -> Timestamp {
        Utc::now()
    }

    /// Hand an event to the dispatcher. Never fails.
    pub(crate) fn notify(&self, event: NotificationEvent) {
        self.dispatcher.dispatch(event);
    }
}

pub(crate) fn project_ref(project: &Project) -> ProjectRef {
    ProjectRef {
        id: project.id,
        title: project.title.clone(),
    }
}

pub(crate) fn owner_recipient(project: &Project) -> Recipient {
    Recipient::new(Some(project.owner_id), project.owner_email.clone())
}

pub(crate) fn respondent_recipient(project: &Project) -> Recipient {
    Recipient::new(
        project.respondent_account_id,
        Some(project.respondent_email.clone()),
    )
}

