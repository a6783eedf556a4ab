//! HTTP-level integration tests for the channel dashboard.

mod common;

use axum::http::StatusCode;
use common::{body_json, get_auth, post_json_auth};
use sqlx::PgPool;

/// A fresh channel reports zeroes across the board.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_stats_for_empty_channel(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_and_login(app.clone(), "creator").await;

    let response = get_auth(app, "/api/v1/dashboard/stats", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_videos"], 0);
    assert_eq!(json["data"]["total_views"], 0);
    assert_eq!(json["data"]["total_learners"], 0);
    assert_eq!(json["data"]["total_completions"], 0);
}

/// Stats aggregate videos, views, distinct learners, and completions.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_stats_aggregate_catalog(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (owner_token, _) = common::register_and_login(app.clone(), "owner").await;
    let (learner_token, _) = common::register_and_login(app.clone(), "learner").await;

    let video_id = common::create_video(app.clone(), &owner_token, "Lesson", 100.0).await;
    common::create_video(app.clone(), &owner_token, "Other lesson", 100.0).await;

    post_json_auth(
        app.clone(),
        &format!("/api/v1/videos/{video_id}/view"),
        &learner_token,
        serde_json::json!({}),
    )
    .await;
    post_json_auth(
        app.clone(),
        &format!("/api/v1/progress/videos/{video_id}/watch"),
        &learner_token,
        serde_json::json!({ "watch_time_secs": 95.0 }),
    )
    .await;

    let response = get_auth(app, "/api/v1/dashboard/stats", &owner_token).await;
    let json = body_json(response).await;
    assert_eq!(json["data"]["total_videos"], 2);
    assert_eq!(json["data"]["total_views"], 1);
    assert_eq!(json["data"]["total_learners"], 1);
    assert_eq!(json["data"]["total_completions"], 1);
}

/// The dashboard catalog lists the owner's videos, newest first.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_dashboard_videos_newest_first(pool: PgPool) {
    let app = common::build_test_app(pool);
    let (token, _) = common::register_and_login(app.clone(), "creator").await;
    let (other_token, _) = common::register_and_login(app.clone(), "other").await;

    common::create_video(app.clone(), &token, "Older", 60.0).await;
    common::create_video(app.clone(), &token, "Newer", 60.0).await;
    common::create_video(app.clone(), &other_token, "Not mine", 60.0).await;

    let response = get_auth(app, "/api/v1/dashboard/videos", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let videos = json["data"].as_array().unwrap();
    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0]["title"], "Newer");
    assert_eq!(videos[1]["title"], "Older");
}
