//! Detached, best-effort execution of notification deliveries.
//!
//! [`NotificationDispatcher::dispatch`] returns immediately. The deliveries
//! run on a [`TaskTracker`], each bounded by a timeout, and every failure is
//! logged inside the task. Nothing ever propagates back to the caller.

use std::sync::Arc;
use std::time::Duration;

use brieflink_core::types::DbId;
use brieflink_db::store::RecordStore;
use tokio_util::task::TaskTracker;

use crate::delivery::email::Mailer;
use crate::event::NotificationEvent;
use crate::plan::{plan_deliveries, Delivery};

/// Default per-delivery timeout.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Settings for [`NotificationDispatcher`].
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Upper bound on any single in-app write or email send.
    pub delivery_timeout: Duration,
    /// Public web origin used for links in emails.
    pub public_base_url: String,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
            public_base_url: "http://localhost:5173".to_string(),
        }
    }
}

/// Fans events out to in-app records and email.
pub struct NotificationDispatcher {
    store: Arc<dyn RecordStore>,
    mailer: Option<Arc<dyn Mailer>>,
    tracker: TaskTracker,
    config: DispatcherConfig,
}

impl NotificationDispatcher {
    /// Create a dispatcher. With `mailer = None` email deliveries are
    /// skipped (logged at `debug`).
    pub fn new(
        store: Arc<dyn RecordStore>,
        mailer: Option<Arc<dyn Mailer>>,
        config: DispatcherConfig,
    ) -> Self {
        Self {
            store,
            mailer,
            tracker: TaskTracker::new(),
            config,
        }
    }

    /// Fire-and-forget. Must be called from within a tokio runtime.
    pub fn dispatch(&self, event: NotificationEvent) {
        let deliveries = plan_deliveries(&event, &self.config.public_base_url);
        if deliveries.is_empty() {
            tracing::debug!(event = event.name(), "No deliveries for event");
            return;
        }

        let store = Arc::clone(&self.store);
        let mailer = self.mailer.clone();
        let timeout = self.config.delivery_timeout;
        let event_name = event.name();
        let project_id = event.project().id;

        self.tracker.spawn(async move {
            for delivery in deliveries {
                run_delivery(&*store, mailer.as_deref(), delivery, timeout, event_name, project_id)
                    .await;
            }
        });
    }

    /// Wait until every dispatch issued so far has finished.
    ///
    /// Used by tests to observe side effects deterministically.
    pub async fn settle(&self) {
        self.tracker.close();
        self.tracker.wait().await;
        self.tracker.reopen();
    }

    /// Wait up to `grace` for in-flight dispatches during shutdown.
    ///
    /// Returns `false` if some were still running when the grace period
    /// ran out.
    pub async fn shutdown(&self, grace: Duration) -> bool {
        self.tracker.close();
        let drained = tokio::time::timeout(grace, self.tracker.wait()).await.is_ok();
        if !drained {
            tracing::warn!(
                pending = self.tracker.len(),
                "Shutdown grace period elapsed with notifications in flight"
            );
        }
        drained
    }

    /// Number of dispatch tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }
}

async fn run_delivery(
    store: &dyn RecordStore,
    mailer: Option<&dyn Mailer>,
    delivery: Delivery,
    timeout: Duration,
    event_name: &'static str,
    project_id: DbId,
) {
    match delivery {
        Delivery::InApp(notification) => {
            match tokio::time::timeout(timeout, store.create_notification(&notification)).await {
                Ok(Ok(created)) => tracing::debug!(
                    event = event_name,
                    project_id,
                    notification_id = created.id,
                    recipient_id = created.recipient_id,
                    "In-app notification created"
                ),
                Ok(Err(e)) => tracing::warn!(
                    event = event_name,
                    project_id,
                    error = %e,
                    "Failed to create in-app notification"
                ),
                Err(_) => tracing::warn!(
                    event = event_name,
                    project_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "In-app notification timed out"
                ),
            }
        }
        Delivery::Email(message) => {
            let Some(mailer) = mailer else {
                tracing::debug!(event = event_name, project_id, "Email not configured, skipping");
                return;
            };
            match tokio::time::timeout(timeout, mailer.send(&message)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::warn!(
                    event = event_name,
                    project_id,
                    error = %e,
                    "Failed to send notification email"
                ),
                Err(_) => tracing::warn!(
                    event = event_name,
                    project_id,
                    timeout_ms = timeout.as_millis() as u64,
                    "Notification email timed out"
                ),
            }
        }
    }
}
