//! Shared helpers for API integration tests: router construction with a
//! scripted AI provider and recording notifier, plus HTTP request helpers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use edutube_ai::{ContentProvider, ProviderError};
use edutube_api::auth::jwt::JwtConfig;
use edutube_api::config::ServerConfig;
use edutube_api::notifications::{NoopNotifier, Notifier, NotifyError};
use edutube_api::router::build_app_router;
use edutube_api::state::AppState;
use edutube_core::content::{Chapter, QuizQuestion};
use edutube_core::progress::Milestone;
use edutube_pipeline::EnrichmentPipeline;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// Build the full application router with the default scripted provider
/// and a no-op notifier.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(
        pool,
        Arc::new(ScriptedProvider::default()),
        Arc::new(NoopNotifier),
    )
}

/// Build the router with an explicit provider and notifier.
pub fn build_test_app_with(
    pool: PgPool,
    provider: Arc<dyn ContentProvider>,
    notifier: Arc<dyn Notifier>,
) -> Router {
    let config = test_config();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        pipeline: EnrichmentPipeline::new(pool, provider),
        notifier,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Scripted AI provider
// ---------------------------------------------------------------------------

/// Provider capabilities, for scripting a failure point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Transcript,
    Summary,
    Chapters,
    Quiz,
    Keywords,
    Objectives,
}

/// Returns canned content for every capability, optionally failing at one.
#[derive(Default)]
pub struct ScriptedProvider {
    pub fail_at: Option<Capability>,
}

impl ScriptedProvider {
    pub fn failing_at(capability: Capability) -> Self {
        Self {
            fail_at: Some(capability),
        }
    }

    fn check(&self, capability: Capability) -> Result<(), ProviderError> {
        if self.fail_at == Some(capability) {
            return Err(ProviderError::Api {
                status: 503,
                body: "quota exhausted".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn generate_transcript(&self, _media_url: &str) -> Result<String, ProviderError> {
        self.check(Capability::Transcript)?;
        Ok("a transcript".into())
    }

    async fn generate_summary(&self, _transcript: &str) -> Result<String, ProviderError> {
        self.check(Capability::Summary)?;
        Ok("a summary".into())
    }

    async fn detect_chapters(&self, _transcript: &str) -> Result<Vec<Chapter>, ProviderError> {
        self.check(Capability::Chapters)?;
        Ok(vec![Chapter {
            title: "Introduction".into(),
            start_time: 0.0,
            end_time: 60.0,
            summary: "Opening remarks".into(),
        }])
    }

    async fn generate_quiz(&self, _transcript: &str) -> Result<Vec<QuizQuestion>, ProviderError> {
        self.check(Capability::Quiz)?;
        Ok(vec![
            QuizQuestion {
                question: "First question?".into(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: 0,
                explanation: "a is right".into(),
                difficulty: Default::default(),
                topic: None,
            },
            QuizQuestion {
                question: "Second question?".into(),
                options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
                correct_answer: 2,
                explanation: "c is right".into(),
                difficulty: Default::default(),
                topic: None,
            },
        ])
    }

    async fn extract_keywords(&self, _transcript: &str) -> Result<Vec<String>, ProviderError> {
        self.check(Capability::Keywords)?;
        Ok(vec!["ownership".into()])
    }

    async fn generate_learning_objectives(
        &self,
        _transcript: &str,
    ) -> Result<Vec<String>, ProviderError> {
        self.check(Capability::Objectives)?;
        Ok(vec!["Understand the borrow checker".into()])
    }
}

// ---------------------------------------------------------------------------
// Recording notifier
// ---------------------------------------------------------------------------

/// Notifier that records milestone sends instead of delivering them.
#[derive(Default, Clone)]
pub struct RecordingNotifier {
    pub milestones: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn milestone_titles(&self) -> Vec<String> {
        self.milestones.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_welcome(&self, _to_email: &str, _full_name: &str) -> Result<(), NotifyError> {
        Ok(())
    }

    async fn send_milestone(
        &self,
        _to_email: &str,
        _full_name: &str,
        milestone: &Milestone,
    ) -> Result<(), NotifyError> {
        self.milestones
            .lock()
            .unwrap()
            .push(milestone.title.to_string());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("request should succeed")
}

fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(
        app,
        Request::builder().uri(uri).body(Body::empty()).unwrap(),
    )
    .await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        Request::builder()
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, None, body)).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::POST, uri, Some(token), body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    send(app, json_request(Method::PATCH, uri, Some(token), body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(
        app,
        Request::builder()
            .method(Method::DELETE)
            .uri(uri)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Scenario helpers
// ---------------------------------------------------------------------------

/// Register a user through the API and log them in; returns (token, user id).
pub async fn register_and_login(app: Router, username: &str) -> (String, i64) {
    let response = post_json(
        app.clone(),
        "/api/v1/auth/register",
        serde_json::json!({
            "username": username,
            "email": format!("{username}@test.com"),
            "full_name": "Test User",
            "password": "test_password_123!",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let user = body_json(response).await;

    let response = post_json(
        app,
        "/api/v1/auth/login",
        serde_json::json!({ "username": username, "password": "test_password_123!" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    (
        json["access_token"].as_str().unwrap().to_string(),
        user["id"].as_i64().unwrap(),
    )
}

/// Publish a video through the API; returns its id.
pub async fn create_video(app: Router, token: &str, title: &str, duration_secs: f64) -> i64 {
    let response = post_json_auth(
        app,
        "/api/v1/videos",
        token,
        serde_json::json!({
            "video_file": "https://cdn.test/videos/1.mp4",
            "thumbnail": "https://cdn.test/thumbs/1.jpg",
            "title": title,
            "description": "a test video",
            "category": "rust",
            "difficulty": "beginner",
            "duration_secs": duration_secs,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}
