mod common;

use assert_matches::assert_matches;
use brieflink_core::error::CoreError;
use brieflink_core::lifecycle::ProjectStatus;
use brieflink_workflow::{LifecycleEngine, Questionnaire, SubmissionPipeline};
use common::*;
use futures::future::join_all;
use serde_json::json;

const CONTENDERS: usize = 8;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submissions_produce_exactly_one_brief() {
    let h = Harness::new();
    let (id, token) = h.sent_project().await;
    Questionnaire::save_response(&h.ctx, &respondent(&token), id, "typography", json!("serif"))
        .await
        .unwrap();

    let handles = (0..CONTENDERS).map(|_| {
        let ctx = h.ctx.clone();
        let token = token.clone();
        tokio::spawn(async move { SubmissionPipeline::submit(&ctx, &respondent(&token), id).await })
    });
    let results: Vec<_> = join_all(handles)
        .await
        .into_iter()
        .map(|joined| joined.expect("submit task panicked"))
        .collect();

    let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(winners.len(), 1);
    for result in results.iter().filter(|r| r.is_err()) {
        assert_matches!(result, Err(CoreError::AlreadySubmitted));
    }

    let brief = SubmissionPipeline::get_brief(&h.ctx, &owner(), id).await.unwrap();
    assert_eq!(brief.brief.id, winners[0].brief.id);
    assert_eq!(brief.brief.version, 1);

    let detail = LifecycleEngine::get_project(&h.ctx, &owner(), id).await.unwrap();
    assert_eq!(detail.project.status, ProjectStatus::Completed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn saves_racing_a_submission_never_alter_the_brief() {
    let h = Harness::new();
    let (id, token) = h.sent_project().await;
    Questionnaire::save_response(&h.ctx, &respondent(&token), id, "typography", json!("serif"))
        .await
        .unwrap();

    let saves = (0..CONTENDERS).map(|i| {
        let ctx = h.ctx.clone();
        let token = token.clone();
        tokio::spawn(async move {
            Questionnaire::save_response(
                &ctx,
                &respondent(&token),
                id,
                "competitors",
                json!([format!("rival-{i}")]),
            )
            .await
        })
    });
    let submit = {
        let ctx = h.ctx.clone();
        let token = token.clone();
        tokio::spawn(async move { SubmissionPipeline::submit(&ctx, &respondent(&token), id).await })
    };

    let save_results = join_all(saves).await;
    let submitted = submit.await.unwrap().unwrap();

    for result in save_results {
        match result.unwrap() {
            Ok(_) | Err(CoreError::AlreadySubmitted) => {}
            Err(other) => panic!("unexpected save error: {other}"),
        }
    }

    // Whatever the interleaving, the stored brief is the one submit returned.
    let stored = SubmissionPipeline::get_brief(&h.ctx, &owner(), id).await.unwrap();
    assert_eq!(stored.brief.content, submitted.brief.content);
}
