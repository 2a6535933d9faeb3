//! In-process [`RecordStore`] used by tests and local development.
//!
//! All tables live behind one `tokio::sync::Mutex`, so every command is
//! serialized: of two racing writers one wins and the other observes the
//! changed row or a unique violation, exactly as with PostgreSQL.

use std::collections::BTreeMap;

use async_trait::async_trait;
use brieflink_core::brief::{BriefContent, INITIAL_BRIEF_VERSION};
use brieflink_core::lifecycle::{Phase, ProjectStatus};
use brieflink_core::revision::RevisionStatus;
use brieflink_core::types::{DbId, Timestamp};
use chrono::Utc;
use tokio::sync::Mutex;

use super::{RecordStore, StoreError, StoreResult, UQ_BRIEFS_PROJECT};
use crate::models::asset::{Asset, CreateAsset};
use crate::models::brief::{Brief, RegenerateOutcome};
use crate::models::lifecycle::LifecycleState;
use crate::models::message::{CreateMessage, Message};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::project::{CreateProject, Project};
use crate::models::response::Response;
use crate::models::revision_request::{CreateRevisionRequest, RevisionRequest};

const UQ_PROJECTS_ACCESS_TOKEN: &str = "uq_projects_access_token";
const UQ_PROJECTS_SHARE_TOKEN: &str = "uq_projects_share_token";

#[derive(Default)]
struct Tables {
    next_id: DbId,
    projects: BTreeMap<DbId, Project>,
    lifecycle: BTreeMap<DbId, LifecycleState>,
    responses: Vec<Response>,
    briefs: BTreeMap<DbId, Brief>,
    revision_requests: Vec<RevisionRequest>,
    messages: Vec<Message>,
    assets: Vec<Asset>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }

    fn require_project(&self, project_id: DbId) -> StoreResult<()> {
        if self.projects.contains_key(&project_id) {
            Ok(())
        } else {
            Err(StoreError::Backend(format!(
                "foreign key violation: project {project_id} does not exist"
            )))
        }
    }

    fn token_taken(&self, except: Option<DbId>, token: &str, share: bool) -> bool {
        self.projects.values().any(|p| {
            Some(p.id) != except
                && if share {
                    p.share_token.as_deref() == Some(token)
                } else {
                    p.access_token == token
                }
        })
    }
}

/// [`RecordStore`] holding everything in memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of rows in every project-scoped table for `project_id`.
    ///
    /// Lets tests assert that a cascade left nothing behind.
    pub async fn dependent_row_count(&self, project_id: DbId) -> usize {
        let t = self.tables.lock().await;
        usize::from(t.lifecycle.contains_key(&project_id))
            + usize::from(t.briefs.contains_key(&project_id))
            + t.responses.iter().filter(|r| r.project_id == project_id).count()
            + t.revision_requests.iter().filter(|r| r.project_id == project_id).count()
            + t.messages.iter().filter(|m| m.project_id == project_id).count()
            + t.assets.iter().filter(|a| a.project_id == project_id).count()
            + t.notifications
                .iter()
                .filter(|n| n.project_id == Some(project_id))
                .count()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn create_project(&self, input: &CreateProject) -> StoreResult<(Project, LifecycleState)> {
        let mut t = self.tables.lock().await;
        if t.token_taken(None, &input.access_token, false) {
            return Err(StoreError::UniqueViolation {
                constraint: UQ_PROJECTS_ACCESS_TOKEN.to_string(),
            });
        }

        let now = Utc::now();
        let id = t.next_id();
        let project = Project {
            id,
            owner_id: input.owner_id,
            owner_email: input.owner_email.clone(),
            title: input.title.clone(),
            category: input.category,
            respondent_email: input.respondent_email.clone(),
            respondent_account_id: input.respondent_account_id,
            status: ProjectStatus::Draft,
            access_token: input.access_token.clone(),
            share_token: None,
            last_accessed_at: None,
            sent_at: None,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        let lifecycle = LifecycleState {
            project_id: id,
            current_phase: Phase::Discovery,
            completed_phases: Vec::new(),
            blockers: Vec::new(),
            revision_cycles: 0,
            lock_version: 0,
            updated_at: now,
        };
        t.projects.insert(id, project.clone());
        t.lifecycle.insert(id, lifecycle.clone());
        Ok((project, lifecycle))
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(self.tables.lock().await.projects.get(&id).cloned())
    }

    async fn find_project_by_share_token(&self, share_token: &str) -> StoreResult<Option<Project>> {
        let t = self.tables.lock().await;
        Ok(t.projects
            .values()
            .find(|p| p.share_token.as_deref() == Some(share_token))
            .cloned())
    }

    async fn list_projects_for_owner(&self, owner_id: DbId) -> StoreResult<Vec<Project>> {
        let t = self.tables.lock().await;
        Ok(t.projects
            .values()
            .rev()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn transition_status(
        &self,
        id: DbId,
        expected: ProjectStatus,
        next: ProjectStatus,
        at: Timestamp,
    ) -> StoreResult<Option<Project>> {
        let mut t = self.tables.lock().await;
        let Some(project) = t.projects.get_mut(&id).filter(|p| p.status == expected) else {
            return Ok(None);
        };
        project.status = next;
        if next == ProjectStatus::Sent {
            project.sent_at = Some(at);
        }
        project.completed_at = if next.is_submitted() {
            project.completed_at.or(Some(at))
        } else {
            None
        };
        project.updated_at = at;
        Ok(Some(project.clone()))
    }

    async fn touch_project(&self, id: DbId, at: Timestamp) -> StoreResult<()> {
        if let Some(project) = self.tables.lock().await.projects.get_mut(&id) {
            project.last_accessed_at = Some(at);
        }
        Ok(())
    }

    async fn set_share_token(
        &self,
        id: DbId,
        share_token: Option<&str>,
    ) -> StoreResult<Option<Project>> {
        let mut t = self.tables.lock().await;
        if let Some(token) = share_token {
            if t.token_taken(Some(id), token, true) {
                return Err(StoreError::UniqueViolation {
                    constraint: UQ_PROJECTS_SHARE_TOKEN.to_string(),
                });
            }
        }
        Ok(t.projects.get_mut(&id).map(|p| {
            p.share_token = share_token.map(str::to_string);
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn set_access_token(&self, id: DbId, access_token: &str) -> StoreResult<Option<Project>> {
        let mut t = self.tables.lock().await;
        if t.token_taken(Some(id), access_token, false) {
            return Err(StoreError::UniqueViolation {
                constraint: UQ_PROJECTS_ACCESS_TOKEN.to_string(),
            });
        }
        Ok(t.projects.get_mut(&id).map(|p| {
            p.access_token = access_token.to_string();
            p.updated_at = Utc::now();
            p.clone()
        }))
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        t.notifications.retain(|n| n.project_id != Some(id));
        t.messages.retain(|m| m.project_id != id);
        t.assets.retain(|a| a.project_id != id);
        t.revision_requests.retain(|r| r.project_id != id);
        t.briefs.remove(&id);
        t.responses.retain(|r| r.project_id != id);
        t.lifecycle.remove(&id);
        Ok(t.projects.remove(&id).is_some())
    }

    async fn find_lifecycle(&self, project_id: DbId) -> StoreResult<Option<LifecycleState>> {
        Ok(self.tables.lock().await.lifecycle.get(&project_id).cloned())
    }

    async fn update_lifecycle(
        &self,
        state: &LifecycleState,
        at: Timestamp,
    ) -> StoreResult<Option<LifecycleState>> {
        let mut t = self.tables.lock().await;
        let Some(row) = t
            .lifecycle
            .get_mut(&state.project_id)
            .filter(|row| row.lock_version == state.lock_version)
        else {
            return Ok(None);
        };
        *row = LifecycleState {
            lock_version: state.lock_version + 1,
            updated_at: at,
            ..state.clone()
        };
        Ok(Some(row.clone()))
    }

    async fn reopen_for_revision(
        &self,
        state: &LifecycleState,
        at: Timestamp,
    ) -> StoreResult<Option<(Project, LifecycleState)>> {
        let mut t = self.tables.lock().await;
        let status_ok = t
            .projects
            .get(&state.project_id)
            .is_some_and(|p| p.status == ProjectStatus::Completed);
        let lock_ok = t
            .lifecycle
            .get(&state.project_id)
            .is_some_and(|row| row.lock_version == state.lock_version);
        if !(status_ok && lock_ok) {
            return Ok(None);
        }

        let Some(project) = t.projects.get_mut(&state.project_id) else {
            return Ok(None);
        };
        project.status = ProjectStatus::InProgress;
        project.completed_at = None;
        project.updated_at = at;
        let project = project.clone();

        let Some(row) = t.lifecycle.get_mut(&state.project_id) else {
            return Ok(None);
        };
        row.current_phase = state.current_phase;
        row.completed_phases = state.completed_phases.clone();
        row.revision_cycles = state.revision_cycles;
        row.lock_version += 1;
        row.updated_at = at;
        Ok(Some((project, row.clone())))
    }

    async fn upsert_response(
        &self,
        project_id: DbId,
        step_key: &str,
        answers: &serde_json::Value,
    ) -> StoreResult<Option<Response>> {
        let mut t = self.tables.lock().await;
        let accepts = t
            .projects
            .get(&project_id)
            .is_some_and(|p| p.status.accepts_respondent_edits());
        if !accepts {
            return Ok(None);
        }

        let now = Utc::now();
        if let Some(existing) = t
            .responses
            .iter_mut()
            .find(|r| r.project_id == project_id && r.step_key == step_key)
        {
            existing.answers = answers.clone();
            existing.updated_at = now;
            return Ok(Some(existing.clone()));
        }

        let response = Response {
            id: t.next_id(),
            project_id,
            step_key: step_key.to_string(),
            answers: answers.clone(),
            created_at: now,
            updated_at: now,
        };
        t.responses.push(response.clone());
        Ok(Some(response))
    }

    async fn list_responses(&self, project_id: DbId) -> StoreResult<Vec<Response>> {
        let t = self.tables.lock().await;
        Ok(t.responses
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn submit_brief(
        &self,
        project_id: DbId,
        content: &BriefContent,
        at: Timestamp,
    ) -> StoreResult<Option<(Project, Brief)>> {
        let mut t = self.tables.lock().await;
        let accepts = t
            .projects
            .get(&project_id)
            .is_some_and(|p| p.status.accepts_respondent_edits());
        if !accepts {
            return Ok(None);
        }
        if t.briefs.contains_key(&project_id) {
            return Err(StoreError::UniqueViolation {
                constraint: UQ_BRIEFS_PROJECT.to_string(),
            });
        }

        let brief = Brief {
            id: t.next_id(),
            project_id,
            version: INITIAL_BRIEF_VERSION,
            content: content.clone(),
            artifact_ref: None,
            created_at: at,
            updated_at: at,
        };
        t.briefs.insert(project_id, brief.clone());

        let Some(project) = t.projects.get_mut(&project_id) else {
            return Ok(None);
        };
        project.status = ProjectStatus::Completed;
        project.completed_at = Some(at);
        project.updated_at = at;
        Ok(Some((project.clone(), brief)))
    }

    async fn regenerate_brief(
        &self,
        project_id: DbId,
        expected_version: i32,
        content: &BriefContent,
        at: Timestamp,
    ) -> StoreResult<RegenerateOutcome> {
        let mut t = self.tables.lock().await;
        let status_ok = t
            .projects
            .get(&project_id)
            .is_some_and(|p| p.status == ProjectStatus::InProgress);
        let version_ok = t
            .briefs
            .get(&project_id)
            .is_some_and(|b| b.version == expected_version);
        if !(status_ok && version_ok) {
            return Ok(RegenerateOutcome::Stale);
        }

        let pending = t
            .revision_requests
            .iter()
            .filter(|r| r.project_id == project_id && r.status == RevisionStatus::Pending)
            .count() as i64;
        if pending > 0 {
            return Ok(RegenerateOutcome::PendingRequests(pending));
        }

        let Some(brief) = t.briefs.get_mut(&project_id) else {
            return Ok(RegenerateOutcome::Stale);
        };
        brief.version += 1;
        brief.content = content.clone();
        brief.artifact_ref = None;
        brief.updated_at = at;
        let brief = brief.clone();

        let Some(project) = t.projects.get_mut(&project_id) else {
            return Ok(RegenerateOutcome::Stale);
        };
        project.status = ProjectStatus::Completed;
        project.completed_at = Some(at);
        project.updated_at = at;
        Ok(RegenerateOutcome::Regenerated {
            project: project.clone(),
            brief,
        })
    }

    async fn find_brief(&self, project_id: DbId) -> StoreResult<Option<Brief>> {
        Ok(self.tables.lock().await.briefs.get(&project_id).cloned())
    }

    async fn create_revision_request(
        &self,
        input: &CreateRevisionRequest,
    ) -> StoreResult<RevisionRequest> {
        let mut t = self.tables.lock().await;
        t.require_project(input.project_id)?;
        let request = RevisionRequest {
            id: t.next_id(),
            project_id: input.project_id,
            requester_id: input.requester_id,
            step_key: input.step_key.clone(),
            field_key: input.field_key.clone(),
            message: input.message.clone(),
            status: RevisionStatus::Pending,
            response: None,
            created_at: Utc::now(),
            responded_at: None,
        };
        t.revision_requests.push(request.clone());
        Ok(request)
    }

    async fn find_revision_request(
        &self,
        project_id: DbId,
        id: DbId,
    ) -> StoreResult<Option<RevisionRequest>> {
        let t = self.tables.lock().await;
        Ok(t.revision_requests
            .iter()
            .find(|r| r.id == id && r.project_id == project_id)
            .cloned())
    }

    async fn respond_revision_request(
        &self,
        project_id: DbId,
        id: DbId,
        response: &str,
        at: Timestamp,
    ) -> StoreResult<Option<RevisionRequest>> {
        let mut t = self.tables.lock().await;
        Ok(t.revision_requests
            .iter_mut()
            .find(|r| {
                r.id == id && r.project_id == project_id && r.status == RevisionStatus::Pending
            })
            .map(|r| {
                r.status = RevisionStatus::Responded;
                r.response = Some(response.to_string());
                r.responded_at = Some(at);
                r.clone()
            }))
    }

    async fn list_revision_requests(&self, project_id: DbId) -> StoreResult<Vec<RevisionRequest>> {
        let t = self.tables.lock().await;
        Ok(t.revision_requests
            .iter()
            .filter(|r| r.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn count_pending_revision_requests(&self, project_id: DbId) -> StoreResult<i64> {
        let t = self.tables.lock().await;
        Ok(t.revision_requests
            .iter()
            .filter(|r| r.project_id == project_id && r.status == RevisionStatus::Pending)
            .count() as i64)
    }

    async fn create_message(&self, input: &CreateMessage) -> StoreResult<Message> {
        let mut t = self.tables.lock().await;
        t.require_project(input.project_id)?;
        let message = Message {
            id: t.next_id(),
            project_id: input.project_id,
            sender_kind: input.sender_kind,
            sender_id: input.sender_id,
            body: input.body.clone(),
            metadata: input.metadata.clone(),
            created_at: Utc::now(),
        };
        t.messages.push(message.clone());
        Ok(message)
    }

    async fn list_messages(&self, project_id: DbId) -> StoreResult<Vec<Message>> {
        let t = self.tables.lock().await;
        Ok(t.messages
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_asset(&self, input: &CreateAsset) -> StoreResult<Asset> {
        let mut t = self.tables.lock().await;
        t.require_project(input.project_id)?;
        let asset = Asset {
            id: t.next_id(),
            project_id: input.project_id,
            kind: input.kind.clone(),
            storage_key: input.storage_key.clone(),
            label: input.label.clone(),
            created_at: Utc::now(),
        };
        t.assets.push(asset.clone());
        Ok(asset)
    }

    async fn list_assets(&self, project_id: DbId) -> StoreResult<Vec<Asset>> {
        let t = self.tables.lock().await;
        Ok(t.assets
            .iter()
            .filter(|a| a.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        let mut t = self.tables.lock().await;
        if let Some(project_id) = input.project_id {
            t.require_project(project_id)?;
        }
        let notification = Notification {
            id: t.next_id(),
            recipient_id: input.recipient_id,
            kind: input.kind,
            title: input.title.clone(),
            message: input.message.clone(),
            project_id: input.project_id,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        t.notifications.push(notification.clone());
        Ok(notification)
    }

    async fn list_notifications(
        &self,
        recipient_id: DbId,
        unread_only: bool,
        limit: i64,
    ) -> StoreResult<Vec<Notification>> {
        let t = self.tables.lock().await;
        Ok(t.notifications
            .iter()
            .rev()
            .filter(|n| n.recipient_id == recipient_id && (!unread_only || !n.is_read))
            .take(usize::try_from(limit).unwrap_or(0))
            .cloned()
            .collect())
    }

    async fn mark_notification_read(&self, recipient_id: DbId, id: DbId) -> StoreResult<bool> {
        let mut t = self.tables.lock().await;
        let Some(n) = t
            .notifications
            .iter_mut()
            .find(|n| n.id == id && n.recipient_id == recipient_id && !n.is_read)
        else {
            return Ok(false);
        };
        n.is_read = true;
        n.read_at = Some(Utc::now());
        Ok(true)
    }

    async fn mark_all_notifications_read(&self, recipient_id: DbId) -> StoreResult<u64> {
        let mut t = self.tables.lock().await;
        let now = Utc::now();
        let mut changed = 0;
        for n in t
            .notifications
            .iter_mut()
            .filter(|n| n.recipient_id == recipient_id && !n.is_read)
        {
            n.is_read = true;
            n.read_at = Some(now);
            changed += 1;
        }
        Ok(changed)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
