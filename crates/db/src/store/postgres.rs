//! [`RecordStore`] over a PostgreSQL pool, delegating to the repositories.

use async_trait::async_trait;
use brieflink_core::brief::BriefContent;
use brieflink_core::lifecycle::ProjectStatus;
use brieflink_core::types::{DbId, Timestamp};

use super::{RecordStore, StoreResult};
use crate::models::asset::{Asset, CreateAsset};
use crate::models::brief::{Brief, RegenerateOutcome};
use crate::models::lifecycle::LifecycleState;
use crate::models::message::{CreateMessage, Message};
use crate::models::notification::{CreateNotification, Notification};
use crate::models::project::{CreateProject, Project};
use crate::models::response::Response;
use crate::models::revision_request::{CreateRevisionRequest, RevisionRequest};
use crate::repositories::{
    AssetRepo, BriefRepo, LifecycleRepo, MessageRepo, NotificationRepo, ProjectRepo,
    ResponseRepo, RevisionRequestRepo,
};
use crate::DbPool;

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl RecordStore for PgStore {
    async fn create_project(&self, input: &CreateProject) -> StoreResult<(Project, LifecycleState)> {
        Ok(ProjectRepo::create(&self.pool, input).await?)
    }

    async fn find_project(&self, id: DbId) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_project_by_share_token(&self, share_token: &str) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::find_by_share_token(&self.pool, share_token).await?)
    }

    async fn list_projects_for_owner(&self, owner_id: DbId) -> StoreResult<Vec<Project>> {
        Ok(ProjectRepo::list_for_owner(&self.pool, owner_id).await?)
    }

    async fn transition_status(
        &self,
        id: DbId,
        expected: ProjectStatus,
        next: ProjectStatus,
        at: Timestamp,
    ) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::transition_status(&self.pool, id, expected, next, at).await?)
    }

    async fn touch_project(&self, id: DbId, at: Timestamp) -> StoreResult<()> {
        Ok(ProjectRepo::touch(&self.pool, id, at).await?)
    }

    async fn set_share_token(
        &self,
        id: DbId,
        share_token: Option<&str>,
    ) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::set_share_token(&self.pool, id, share_token).await?)
    }

    async fn set_access_token(&self, id: DbId, access_token: &str) -> StoreResult<Option<Project>> {
        Ok(ProjectRepo::set_access_token(&self.pool, id, access_token).await?)
    }

    async fn delete_project(&self, id: DbId) -> StoreResult<bool> {
        Ok(ProjectRepo::delete_cascade(&self.pool, id).await?)
    }

    async fn find_lifecycle(&self, project_id: DbId) -> StoreResult<Option<LifecycleState>> {
        Ok(LifecycleRepo::find(&self.pool, project_id).await?)
    }

    async fn update_lifecycle(
        &self,
        state: &LifecycleState,
        at: Timestamp,
    ) -> StoreResult<Option<LifecycleState>> {
        Ok(LifecycleRepo::update(&self.pool, state, at).await?)
    }

    async fn reopen_for_revision(
        &self,
        state: &LifecycleState,
        at: Timestamp,
    ) -> StoreResult<Option<(Project, LifecycleState)>> {
        Ok(LifecycleRepo::reopen_for_revision(&self.pool, state, at).await?)
    }

    async fn upsert_response(
        &self,
        project_id: DbId,
        step_key: &str,
        answers: &serde_json::Value,
    ) -> StoreResult<Option<Response>> {
        Ok(ResponseRepo::upsert(&self.pool, project_id, step_key, answers).await?)
    }

    async fn list_responses(&self, project_id: DbId) -> StoreResult<Vec<Response>> {
        Ok(ResponseRepo::list_for_project(&self.pool, project_id).await?)
    }

    async fn submit_brief(
        &self,
        project_id: DbId,
        content: &BriefContent,
        at: Timestamp,
    ) -> StoreResult<Option<(Project, Brief)>> {
        Ok(BriefRepo::submit(&self.pool, project_id, content, at).await?)
    }

    async fn regenerate_brief(
        &self,
        project_id: DbId,
        expected_version: i32,
        content: &BriefContent,
        at: Timestamp,
    ) -> StoreResult<RegenerateOutcome> {
        Ok(BriefRepo::regenerate(&self.pool, project_id, expected_version, content, at).await?)
    }

    async fn find_brief(&self, project_id: DbId) -> StoreResult<Option<Brief>> {
        Ok(BriefRepo::find_for_project(&self.pool, project_id).await?)
    }

    async fn create_revision_request(
        &self,
        input: &CreateRevisionRequest,
    ) -> StoreResult<RevisionRequest> {
        Ok(RevisionRequestRepo::create(&self.pool, input).await?)
    }

    async fn find_revision_request(
        &self,
        project_id: DbId,
        id: DbId,
    ) -> StoreResult<Option<RevisionRequest>> {
        Ok(RevisionRequestRepo::find(&self.pool, project_id, id).await?)
    }

    async fn respond_revision_request(
        &self,
        project_id: DbId,
        id: DbId,
        response: &str,
        at: Timestamp,
    ) -> StoreResult<Option<RevisionRequest>> {
        Ok(RevisionRequestRepo::respond(&self.pool, project_id, id, response, at).await?)
    }

    async fn list_revision_requests(&self, project_id: DbId) -> StoreResult<Vec<RevisionRequest>> {
        Ok(RevisionRequestRepo::list_for_project(&self.pool, project_id).await?)
    }

    async fn count_pending_revision_requests(&self, project_id: DbId) -> StoreResult<i64> {
        Ok(RevisionRequestRepo::count_pending(&self.pool, project_id).await?)
    }

    async fn create_message(&self, input: &CreateMessage) -> StoreResult<Message> {
        Ok(MessageRepo::create(&self.pool, input).await?)
    }

    async fn list_messages(&self, project_id: DbId) -> StoreResult<Vec<Message>> {
        Ok(MessageRepo::list_for_project(&self.pool, project_id).await?)
    }

    async fn create_asset(&self, input: &CreateAsset) -> StoreResult<Asset> {
        Ok(AssetRepo::create(&self.pool, input).await?)
    }

    async fn list_assets(&self, project_id: DbId) -> StoreResult<Vec<Asset>> {
        Ok(AssetRepo::list_for_project(&self.pool, project_id).await?)
    }

    async fn create_notification(&self, input: &CreateNotification) -> StoreResult<Notification> {
        Ok(NotificationRepo::create(&self.pool, input).await?)
    }

    async fn list_notifications(
        &self,
        recipient_id: DbId,
        unread_only: bool,
        limit: i64,
    ) -> StoreResult<Vec<Notification>> {
        Ok(NotificationRepo::list_for_recipient(&self.pool, recipient_id, unread_only, limit).await?)
    }

    async fn mark_notification_read(&self, recipient_id: DbId, id: DbId) -> StoreResult<bool> {
        Ok(NotificationRepo::mark_read(&self.pool, recipient_id, id).await?)
    }

    async fn mark_all_notifications_read(&self, recipient_id: DbId) -> StoreResult<u64> {
        Ok(NotificationRepo::mark_all_read(&self.pool, recipient_id).await?)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(crate::health_check(&self.pool).await?)
    }
}
