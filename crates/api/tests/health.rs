mod common;

use axum::http::StatusCode;
use common::{body_json, get, TestApp};

#[tokio::test]
async fn health_check_reports_store_status() {
    let app = TestApp::new();
    let response = app.send(get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["store_healthy"], true);
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let app = TestApp::new();
    let response = app.send(get("/this-route-does-not-exist")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn response_contains_request_id() {
    let app = TestApp::new();
    let response = app.send(get("/health")).await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must carry x-request-id");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
