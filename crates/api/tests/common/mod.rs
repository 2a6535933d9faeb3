#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use brieflink_api::auth::jwt::{generate_access_token, JwtConfig};
use brieflink_api::config::ServerConfig;
use brieflink_api::router::build_app_router;
use brieflink_api::state::AppState;
use brieflink_core::types::DbId;
use brieflink_db::store::MemoryStore;
use brieflink_events::{DispatcherConfig, NotificationDispatcher};
use brieflink_workflow::WorkflowContext;
use http_body_util::BodyExt;
use tower::ServiceExt;

pub const OWNER_ID: DbId = 11;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "postgres://unused-in-memory-tests".to_string(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        notification_timeout_secs: 2,
        public_base_url: "http://localhost:5173".to_string(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// The full router over an in-memory store, plus handles tests need.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let config = test_config();
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            None,
            DispatcherConfig {
                delivery_timeout: Duration::from_secs(config.notification_timeout_secs),
                public_base_url: config.public_base_url.clone(),
            },
        ));
        let state = AppState {
            workflow: WorkflowContext::new(store, dispatcher),
            config: Arc::new(config),
        };
        let router = build_app_router(state.clone()).unwrap();
        Self { router, state }
    }

    /// Bearer token for `user_id`.
    pub fn bearer(&self, user_id: DbId) -> String {
        let token = generate_access_token(user_id, Some("owner@example.com"), &self.state.config.jwt)
            .unwrap();
        format!("Bearer {token}")
    }

    pub fn owner(&self) -> String {
        self.bearer(OWNER_ID)
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Wait for background notification work to finish.
    pub async fn settle(&self) {
        self.state.workflow.dispatcher.settle().await;
    }

    /// Create a project as the owner and move it to `sent`.
    ///
    /// Returns `(project_id, access_token)`.
    pub async fn sent_project(&self) -> (DbId, String) {
        let response = self
            .send(owner_json(
                &self.owner(),
                Method::POST,
                "/api/v1/projects",
                serde_json::json!({
                    "title": "Acme rebrand",
                    "category": "branding",
                    "respondent_email": "client@example.com"
                }),
            ))
            .await;
        let json = body_json(response).await;
        let id = json["data"]["id"].as_i64().unwrap();
        let token = json["data"]["access_token"].as_str().unwrap().to_string();

        let response = self
            .send(owner_json(
                &self.owner(),
                Method::PUT,
                &format!("/api/v1/projects/{id}/status"),
                serde_json::json!({ "status": "sent" }),
            ))
            .await;
        assert!(response.status().is_success());
        (id, token)
    }
}

/// Collect the response body into JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn owner_request(bearer: &str, method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer)
        .body(Body::empty())
        .unwrap()
}

pub fn owner_json(
    bearer: &str,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", bearer)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn respondent_request(token: &str, method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-magic-token", token)
        .body(Body::empty())
        .unwrap()
}

pub fn respondent_json(
    token: &str,
    method: Method,
    uri: &str,
    body: serde_json::Value,
) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("x-magic-token", token)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}
