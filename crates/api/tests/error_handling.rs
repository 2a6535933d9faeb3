//! `AppError` → HTTP response mapping, checked without a server.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use brieflink_api::error::{AppError, RESPONDENT_ACCESS_MESSAGE};
use brieflink_core::error::CoreError;
use http_body_util::BodyExt;

async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn access_denied_is_403_with_a_generic_message() {
    let (status, json) = error_to_response(CoreError::AccessDenied.into()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "ACCESS_DENIED");
    assert_eq!(json["error"], RESPONDENT_ACCESS_MESSAGE);
}

#[tokio::test]
async fn not_found_is_404() {
    let (status, json) = error_to_response(
        CoreError::NotFound {
            entity: "Project",
            id: 42,
        }
        .into(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Project with id 42 not found");
}

#[tokio::test]
async fn lifecycle_conflicts_are_409() {
    for (err, code) in [
        (
            CoreError::invalid_transition("draft", "reviewed"),
            "INVALID_TRANSITION",
        ),
        (CoreError::AlreadySubmitted, "ALREADY_SUBMITTED"),
        (CoreError::AlreadyResponded, "ALREADY_RESPONDED"),
    ] {
        let (status, json) = error_to_response(err.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["code"], code);
    }
}

#[tokio::test]
async fn validation_is_400_with_the_reason() {
    let (status, json) =
        error_to_response(CoreError::Validation("Title must not be empty".into()).into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_FAILED");
    assert_eq!(json["error"], "Title must not be empty");
}

#[tokio::test]
async fn storage_failures_are_sanitized() {
    let (status, json) =
        error_to_response(CoreError::Storage("connection refused at 10.0.0.5".into()).into())
            .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "STORAGE_FAILURE");
    assert_eq!(json["error"], "An internal error occurred");
}

#[tokio::test]
async fn missing_session_is_401() {
    let (status, json) = error_to_response(AppError::Unauthorized("Missing".into())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
}
