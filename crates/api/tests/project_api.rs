//! Owner and respondent flows over HTTP.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::*;
use serde_json::json;

#[tokio::test]
async fn owner_routes_require_a_session() {
    let app = TestApp::new();

    let response = app.send(get("/api/v1/projects")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .send(owner_request("Bearer not-a-jwt", Method::GET, "/api/v1/projects"))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_validates_and_returns_the_token() {
    let app = TestApp::new();

    let response = app
        .send(owner_json(
            &app.owner(),
            Method::POST,
            "/api/v1/projects",
            json!({"title": "  ", "category": "logo", "respondent_email": "a@b.com"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_FAILED");

    let response = app
        .send(owner_json(
            &app.owner(),
            Method::POST,
            "/api/v1/projects",
            json!({"title": "Logo", "category": "logo", "respondent_email": "a@b.com"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "draft");
    assert_eq!(json["data"]["lifecycle"]["current_phase"], "discovery");
    assert_eq!(json["data"]["access_token"].as_str().unwrap().len(), 48);
}

#[tokio::test]
async fn other_owners_get_404() {
    let app = TestApp::new();
    let (id, _) = app.sent_project().await;

    let response = app
        .send(owner_request(
            &app.bearer(OWNER_ID + 1),
            Method::GET,
            &format!("/api/v1/projects/{id}"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn questionnaire_submission_round() {
    let app = TestApp::new();
    let (id, token) = app.sent_project().await;

    let response = app
        .send(respondent_request(&token, Method::GET, &format!("/api/v1/portal/projects/{id}")))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["project"]["status"], "in_progress");
    assert!(json["data"]["project"].get("access_token").is_none());

    let response = app
        .send(respondent_json(
            &token,
            Method::PUT,
            &format!("/api/v1/portal/projects/{id}/responses/business_info"),
            json!({"answers": {"name": "Acme", "industry": "Retail"}}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let submit_uri = format!("/api/v1/portal/projects/{id}/submit");
    let response = app
        .send(respondent_request(&token, Method::POST, &submit_uri))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["project"]["status"], "completed");
    assert_eq!(json["data"]["brief"]["version"], 1);
    assert_eq!(json["data"]["brief"]["content"]["steps"]["business_info"]["name"], "Acme");

    let response = app
        .send(respondent_request(&token, Method::POST, &submit_uri))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "ALREADY_SUBMITTED");

    // Owner reviews.
    let response = app
        .send(owner_json(
            &app.owner(),
            Method::PUT,
            &format!("/api/v1/projects/{id}/status"),
            json!({"status": "reviewed"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "reviewed");

    app.settle().await;
    let response = app
        .send(owner_request(&app.owner(), Method::GET, "/api/v1/notifications"))
        .await;
    let json = body_json(response).await;
    let kinds: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["brief_submitted"]);
}

#[tokio::test]
async fn respondent_failures_look_identical() {
    let app = TestApp::new();
    let (id, token) = app.sent_project().await;
    let wrong = "z".repeat(token.len());

    let attempts = [
        respondent_request(&wrong, Method::GET, &format!("/api/v1/portal/projects/{id}")),
        get(&format!("/api/v1/portal/projects/{id}")),
        respondent_request(&token, Method::GET, "/api/v1/portal/projects/999999"),
    ];

    let mut bodies = Vec::new();
    for request in attempts {
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        bodies.push(body_json(response).await);
    }
    assert!(bodies.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(bodies[0]["error"], "Link not found or invalid");
}

#[tokio::test]
async fn header_token_wins_over_query() {
    let app = TestApp::new();
    let (id, token) = app.sent_project().await;
    let wrong = "z".repeat(token.len());

    let via_query = app
        .send(get(&format!("/api/v1/portal/projects/{id}?token={token}")))
        .await;
    assert_eq!(via_query.status(), StatusCode::OK);

    let good_header = app
        .send(respondent_request(
            &token,
            Method::GET,
            &format!("/api/v1/portal/projects/{id}?token={wrong}"),
        ))
        .await;
    assert_eq!(good_header.status(), StatusCode::OK);

    let bad_header = app
        .send(respondent_request(
            &wrong,
            Method::GET,
            &format!("/api/v1/portal/projects/{id}?token={token}"),
        ))
        .await;
    assert_eq!(bad_header.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn revision_round_over_http() {
    let app = TestApp::new();
    let (id, token) = app.sent_project().await;
    app.send(respondent_request(
        &token,
        Method::POST,
        &format!("/api/v1/portal/projects/{id}/submit"),
    ))
    .await;

    let response = app
        .send(owner_json(
            &app.owner(),
            Method::POST,
            &format!("/api/v1/projects/{id}/revisions"),
            json!({"step_key": "target_audience", "message": "Which age range?"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let request_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    // The respondent can see the open question.
    let response = app
        .send(respondent_request(
            &token,
            Method::GET,
            &format!("/api/v1/projects/{id}/revisions"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"][0]["status"], "pending");

    let respond_uri = format!("/api/v1/portal/projects/{id}/revisions/{request_id}/respond");
    let response = app
        .send(respondent_json(&token, Method::POST, &respond_uri, json!({"response": "25-40"})))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["status"], "responded");

    let response = app
        .send(respondent_json(&token, Method::POST, &respond_uri, json!({"response": "18-25"})))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "ALREADY_RESPONDED");

    let response = app
        .send(respondent_json(
            &token,
            Method::POST,
            &format!("/api/v1/portal/projects/{id}/revisions/12x/respond"),
            json!({"response": "x"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn messages_accept_either_credential() {
    let app = TestApp::new();
    let (id, token) = app.sent_project().await;
    let uri = format!("/api/v1/projects/{id}/messages");

    let response = app
        .send(respondent_json(&token, Method::POST, &uri, json!({"body": "Hello!"})))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["sender_kind"], "respondent");

    let response = app
        .send(owner_json(
            &app.owner(),
            Method::POST,
            &uri,
            json!({"body": "Approved", "metadata": {"action": "approval"}}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["data"]["kind"], "approval");

    // A present but broken session is not retried as a magic token.
    let request = Request::builder()
        .uri(uri.as_str())
        .header("authorization", "Bearer garbage")
        .header("x-magic-token", &token)
        .body(Body::empty())
        .unwrap();
    assert_eq!(app.send(request).await.status(), StatusCode::UNAUTHORIZED);

    let response = app.send(owner_request(&app.owner(), Method::GET, &uri)).await;
    assert_eq!(body_json(response).await["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn share_link_is_public_and_revocable() {
    let app = TestApp::new();
    let (id, token) = app.sent_project().await;
    app.send(respondent_request(
        &token,
        Method::POST,
        &format!("/api/v1/portal/projects/{id}/submit"),
    ))
    .await;

    let response = app
        .send(owner_request(&app.owner(), Method::POST, &format!("/api/v1/projects/{id}/share")))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let share_token = body_json(response).await["data"]["share_token"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.send(get(&format!("/api/v1/shared/{share_token}"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["project"]["id"], id);

    let response = app
        .send(owner_request(&app.owner(), Method::DELETE, &format!("/api/v1/projects/{id}/share")))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app.send(get(&format!("/api/v1/shared/{share_token}"))).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn delete_then_every_link_is_dead() {
    let app = TestApp::new();
    let (id, token) = app.sent_project().await;

    let response = app
        .send(owner_request(&app.owner(), Method::DELETE, &format!("/api/v1/projects/{id}")))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(owner_request(&app.owner(), Method::GET, &format!("/api/v1/projects/{id}")))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .send(respondent_request(&token, Method::GET, &format!("/api/v1/portal/projects/{id}")))
        .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn phase_and_blockers() {
    let app = TestApp::new();
    let (id, _) = app.sent_project().await;

    let response = app
        .send(owner_json(
            &app.owner(),
            Method::POST,
            &format!("/api/v1/projects/{id}/phase/advance"),
            json!({}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["current_phase"], "proposal");

    let response = app
        .send(owner_json(
            &app.owner(),
            Method::POST,
            &format!("/api/v1/projects/{id}/phase/advance"),
            json!({"target": "discovery"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .send(owner_json(
            &app.owner(),
            Method::POST,
            &format!("/api/v1/projects/{id}/blockers"),
            json!({"description": "Missing brand assets", "severity": "medium"}),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let blocker_id = body_json(response).await["data"]["blockers"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app
        .send(owner_request(
            &app.owner(),
            Method::DELETE,
            &format!("/api/v1/projects/{id}/blockers/{blocker_id}"),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await["data"]["blockers"]
            .as_array()
            .unwrap()
            .len(),
        0
    );
}
