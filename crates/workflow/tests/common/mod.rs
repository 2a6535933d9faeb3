//! Shared harness for workflow integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use brieflink_core::actor::ActorContext;
use brieflink_core::project::ProjectCategory;
use brieflink_core::types::DbId;
use brieflink_db::store::MemoryStore;
use brieflink_events::{
    DispatcherConfig, EmailError, EmailMessage, Mailer, NotificationDispatcher,
};
use brieflink_workflow::lifecycle::NewProject;
use brieflink_workflow::{LifecycleEngine, WorkflowContext};
use tokio::sync::Mutex;

pub const OWNER_ID: DbId = 7;
pub const OWNER_EMAIL: &str = "owner@example.com";
pub const RESPONDENT_EMAIL: &str = "client@example.com";

/// Mailer that keeps every message it was asked to send.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, message: &EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

/// Mailer that always fails.
pub struct BrokenMailer;

#[async_trait]
impl Mailer for BrokenMailer {
    async fn send(&self, _message: &EmailMessage) -> Result<(), EmailError> {
        Err(EmailError::Build("smtp relay down".into()))
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub ctx: WorkflowContext,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            Some(mailer.clone()),
            config(),
        ));
        let ctx = WorkflowContext::new(store.clone(), dispatcher);
        Self { store, mailer, ctx }
    }

    /// Same as [`Harness::new`] but every email fails.
    pub fn with_broken_mailer() -> Self {
        let store = Arc::new(MemoryStore::new());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            Some(Arc::new(BrokenMailer)),
            config(),
        ));
        let ctx = WorkflowContext::new(store.clone(), dispatcher);
        Self {
            store,
            mailer: Arc::new(RecordingMailer::default()),
            ctx,
        }
    }

    pub async fn settle(&self) {
        self.ctx.dispatcher.settle().await;
    }

    /// A fresh `draft` project. Returns its id and access token.
    pub async fn draft_project(&self) -> (DbId, String) {
        let detail = LifecycleEngine::create_project(&self.ctx, &owner(), new_project())
            .await
            .unwrap();
        (detail.project.id, detail.project.access_token)
    }

    /// A project already moved to `sent`.
    pub async fn sent_project(&self) -> (DbId, String) {
        let (id, token) = self.draft_project().await;
        LifecycleEngine::mark_sent(&self.ctx, &owner(), id)
            .await
            .unwrap();
        (id, token)
    }

    pub async fn emails_to(&self, address: &str) -> Vec<EmailMessage> {
        self.mailer
            .sent
            .lock()
            .await
            .iter()
            .filter(|m| m.to == address)
            .cloned()
            .collect()
    }
}

fn config() -> DispatcherConfig {
    DispatcherConfig {
        delivery_timeout: Duration::from_secs(2),
        public_base_url: "https://app.example.com".into(),
    }
}

pub fn new_project() -> NewProject {
    NewProject {
        title: "Acme rebrand".into(),
        category: ProjectCategory::Branding,
        respondent_email: RESPONDENT_EMAIL.into(),
        respondent_account_id: None,
    }
}

pub fn owner() -> ActorContext {
    ActorContext::Owner {
        user_id: OWNER_ID,
        email: Some(OWNER_EMAIL.into()),
    }
}

pub fn stranger() -> ActorContext {
    ActorContext::owner(OWNER_ID + 1)
}

pub fn respondent(token: &str) -> ActorContext {
    ActorContext::respondent(Some(token))
}
