//! HTTP-level integration tests for the AI enrichment endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth, Capability, ScriptedProvider};
use edutube_api::notifications::NoopNotifier;
use sqlx::PgPool;

/// Processing a video enriches every derived field and completes every
/// status.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_process_completes_all_fields(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_and_login(app.clone(), "creator").await;
    let video_id = common::create_video(app.clone(), &token, "Enriched", 120.0).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/ai/videos/{video_id}/process"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = &json["data"];
    for field in ["transcript", "summary", "chapters", "quiz"] {
        assert_eq!(
            data["ai_processing_status"][field], "completed",
            "status for {field}"
        );
    }
    assert_ne!(data["transcript"], "");
    assert_ne!(data["summary"], "");
    assert!(!data["chapters"].as_array().unwrap().is_empty());
    assert!(!data["quiz"].as_array().unwrap().is_empty());
    assert!(!data["keywords"].as_array().unwrap().is_empty());
    assert!(!data["learning_objectives"].as_array().unwrap().is_empty());
}

/// Only the owner may trigger processing.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_process_is_owner_gated(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = common::register_and_login(app.clone(), "owner").await;
    let (other_token, _) = common::register_and_login(app.clone(), "other").await;
    let video_id = common::create_video(app.clone(), &owner_token, "Guarded", 60.0).await;

    let response = post_json_auth(
        app,
        &format!("/api/v1/ai/videos/{video_id}/process"),
        &other_token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Processing a nonexistent video returns 404.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_process_nonexistent_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_and_login(app.clone(), "creator").await;

    let response = post_json_auth(
        app,
        "/api/v1/ai/videos/999999/process",
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

/// A chapters-step failure surfaces 500 with the root cause, and the
/// polled status map settles on the reconciled completed/failed split.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_chapters_failure_reconciles_status(pool: PgPool) {
    let app = common::build_test_app_with(
        pool,
        Arc::new(ScriptedProvider::failing_at(Capability::Chapters)),
        Arc::new(NoopNotifier),
    );
    let (token, _) = common::register_and_login(app.clone(), "creator").await;
    let video_id = common::create_video(app.clone(), &token, "Doomed at step 3", 60.0).await;

    let response = post_json_auth(
        app.clone(),
        &format!("/api/v1/ai/videos/{video_id}/process"),
        &token,
        serde_json::json!({}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert_eq!(json["code"], "ENRICHMENT_FAILED");
    let message = json["error"].as_str().unwrap();
    assert!(message.contains("chapters"), "message was: {message}");

    // The status map is stable across repeated polls.
    let status_uri = format!("/api/v1/ai/videos/{video_id}/status");
    let first = body_json(get_auth(app.clone(), &status_uri, &token).await).await;
    let second = body_json(get_auth(app.clone(), &status_uri, &token).await).await;
    assert_eq!(first, second);

    assert_eq!(first["data"]["transcript"], "completed");
    assert_eq!(first["data"]["summary"], "completed");
    assert_eq!(first["data"]["chapters"], "failed");
    assert_eq!(first["data"]["quiz"], "failed");

    // Content matches the statuses.
    let insights = body_json(
        get_auth(
            app,
            &format!("/api/v1/ai/videos/{video_id}/insights"),
            &token,
        )
        .await,
    )
    .await;
    assert_ne!(insights["data"]["summary"], "");
    assert!(insights["data"]["chapters"].as_array().unwrap().is_empty());
    assert!(insights["data"]["quiz"].as_array().unwrap().is_empty());
}

/// The transcript getter serves the generated text.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_transcript_getter(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_and_login(app.clone(), "creator").await;
    let video_id = common::create_video(app.clone(), &token, "Spoken word", 60.0).await;

    post_json_auth(
        app.clone(),
        &format!("/api/v1/ai/videos/{video_id}/process"),
        &token,
        serde_json::json!({}),
    )
    .await;

    let response = get_auth(
        app,
        &format!("/api/v1/ai/videos/{video_id}/transcript"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["data"]["transcript"], "");
}

/// AI endpoints require authentication.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_status_requires_auth(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::get(app, "/api/v1/ai/videos/1/status").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
