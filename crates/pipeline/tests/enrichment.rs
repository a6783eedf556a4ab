//! Integration tests for the enrichment pipeline against a scripted
//! provider: success path, per-step failure reconciliation, single-flight
//! claiming, and restart behavior.

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use edutube_ai::{ContentProvider, ProviderError};
use edutube_core::content::{Chapter, QuizQuestion};
use edutube_core::processing::{EnrichmentStep, ProcessingState};
use edutube_db::models::user::CreateUser;
use edutube_db::models::video::CreateVideo;
use edutube_db::repositories::{UserRepo, VideoRepo};
use edutube_pipeline::{EnrichmentError, EnrichmentPipeline};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Scripted provider
// ---------------------------------------------------------------------------

/// Provider capabilities, for scripting a failure point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capability {
    Transcript,
    Summary,
    Chapters,
    Quiz,
    Keywords,
    Objectives,
}

/// Returns canned content for every capability, optionally failing at one.
#[derive(Default)]
struct ScriptedProvider {
    fail_at: Option<Capability>,
}

impl ScriptedProvider {
    fn failing_at(capability: Capability) -> Self {
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
        Ok(vec![QuizQuestion {
            question: "What was covered?".into(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 0,
            explanation: "The introduction covered it.".into(),
            difficulty: Default::default(),
            topic: None,
        }])
    }

    async fn extract_keywords(&self, _transcript: &str) -> Result<Vec<String>, ProviderError> {
        self.check(Capability::Keywords)?;
        Ok(vec!["ownership".into(), "borrowing".into()])
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
// Helpers
// ---------------------------------------------------------------------------

/// Create a user and one of their videos; returns the video id.
async fn seed_video(pool: &PgPool) -> i64 {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: "uploader".into(),
            email: "uploader@test.com".into(),
            full_name: "Up Loader".into(),
            password_hash: "irrelevant".into(),
            avatar: String::new(),
        },
    )
    .await
    .expect("user creation should succeed");

    let video = VideoRepo::create(
        pool,
        &CreateVideo {
            owner_id: user.id,
            video_file: "https://cdn.test/videos/1.mp4".into(),
            thumbnail: "https://cdn.test/thumbs/1.jpg".into(),
            title: "Intro to Ownership".into(),
            description: "Rust ownership from first principles".into(),
            category: "rust".into(),
            difficulty: "beginner".into(),
            duration_secs: 120.0,
        },
    )
    .await
    .expect("video creation should succeed");

    video.id
}

fn pipeline(pool: &PgPool, provider: ScriptedProvider) -> EnrichmentPipeline {
    EnrichmentPipeline::new(pool.clone(), Arc::new(provider))
}

/// The four statuses of a video, in pipeline order.
async fn statuses(pool: &PgPool, video_id: i64) -> [ProcessingState; 4] {
    let status = VideoRepo::find_by_id(pool, video_id)
        .await
        .expect("lookup should succeed")
        .expect("video should exist")
        .processing_status();
    [
        status.transcript,
        status.summary,
        status.chapters,
        status.quiz,
    ]
}

// ---------------------------------------------------------------------------
// Initial state
// ---------------------------------------------------------------------------

/// A freshly created record has all statuses pending and no derived content.
#[sqlx::test(migrations = "../db/migrations")]
async fn fresh_record_is_pending_and_empty(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    let video = VideoRepo::find_by_id(&pool, video_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(statuses(&pool, video_id).await, [ProcessingState::Pending; 4]);
    assert!(video.transcript.is_empty());
    assert!(video.summary.is_empty());
    assert!(video.chapters.0.is_empty());
    assert!(video.quiz.0.is_empty());
    assert!(video.keywords.0.is_empty());
    assert!(video.learning_objectives.0.is_empty());
}

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

/// A successful run completes all four statuses and fills every field.
#[sqlx::test(migrations = "../db/migrations")]
async fn successful_run_completes_everything(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    let video = pipeline(&pool, ScriptedProvider::default())
        .enrich(video_id)
        .await
        .expect("enrichment should succeed");

    assert!(video.processing_status().is_fully_completed());
    assert!(!video.transcript.is_empty());
    assert!(!video.summary.is_empty());
    assert!(!video.chapters.0.is_empty());
    assert!(!video.quiz.0.is_empty());
    assert!(!video.keywords.0.is_empty());
    assert!(!video.learning_objectives.0.is_empty());
}

// ---------------------------------------------------------------------------
// Per-step failure reconciliation
// ---------------------------------------------------------------------------

/// A transcript failure leaves every status failed and every field empty.
#[sqlx::test(migrations = "../db/migrations")]
async fn transcript_failure_fails_all_steps(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    let err = pipeline(&pool, ScriptedProvider::failing_at(Capability::Transcript))
        .enrich(video_id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EnrichmentError::Step {
            step: EnrichmentStep::Transcript,
            ..
        }
    );

    assert_eq!(statuses(&pool, video_id).await, [ProcessingState::Failed; 4]);
}

/// A summary failure keeps the transcript completed and fails the rest.
#[sqlx::test(migrations = "../db/migrations")]
async fn summary_failure_keeps_transcript(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    pipeline(&pool, ScriptedProvider::failing_at(Capability::Summary))
        .enrich(video_id)
        .await
        .unwrap_err();

    assert_eq!(
        statuses(&pool, video_id).await,
        [
            ProcessingState::Completed,
            ProcessingState::Failed,
            ProcessingState::Failed,
            ProcessingState::Failed,
        ]
    );
}

/// A chapters failure reports transcript and summary completed with content,
/// chapters and quiz failed with no content.
#[sqlx::test(migrations = "../db/migrations")]
async fn chapters_failure_reconciles_earlier_steps(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    let err = pipeline(&pool, ScriptedProvider::failing_at(Capability::Chapters))
        .enrich(video_id)
        .await
        .unwrap_err();
    assert_matches!(
        err,
        EnrichmentError::Step {
            step: EnrichmentStep::Chapters,
            ..
        }
    );

    assert_eq!(
        statuses(&pool, video_id).await,
        [
            ProcessingState::Completed,
            ProcessingState::Completed,
            ProcessingState::Failed,
            ProcessingState::Failed,
        ]
    );

    let video = VideoRepo::find_by_id(&pool, video_id)
        .await
        .unwrap()
        .unwrap();
    assert!(!video.transcript.is_empty());
    assert!(!video.summary.is_empty());
    assert!(video.chapters.0.is_empty());
    assert!(video.quiz.0.is_empty());
}

/// A quiz failure fails only the quiz.
#[sqlx::test(migrations = "../db/migrations")]
async fn quiz_failure_fails_only_quiz(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    pipeline(&pool, ScriptedProvider::failing_at(Capability::Quiz))
        .enrich(video_id)
        .await
        .unwrap_err();

    assert_eq!(
        statuses(&pool, video_id).await,
        [
            ProcessingState::Completed,
            ProcessingState::Completed,
            ProcessingState::Completed,
            ProcessingState::Failed,
        ]
    );
}

/// A keyword-extraction failure surfaces an error but leaves all four
/// status-tracked fields completed (their content was already persisted).
#[sqlx::test(migrations = "../db/migrations")]
async fn keyword_failure_keeps_statuses_completed(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    let err = pipeline(&pool, ScriptedProvider::failing_at(Capability::Keywords))
        .enrich(video_id)
        .await
        .unwrap_err();
    assert_matches!(err, EnrichmentError::Extraction(_));

    assert_eq!(
        statuses(&pool, video_id).await,
        [ProcessingState::Completed; 4]
    );
}

/// After a failed run the status map is stable: reading it repeatedly
/// observes the same completed/failed split with no further transitions.
#[sqlx::test(migrations = "../db/migrations")]
async fn failed_run_status_is_stable(pool: PgPool) {
    let video_id = seed_video(&pool).await;
    let pipeline = pipeline(&pool, ScriptedProvider::failing_at(Capability::Chapters));

    pipeline.enrich(video_id).await.unwrap_err();

    let first = pipeline.status(video_id).await.unwrap();
    let second = pipeline.status(video_id).await.unwrap();
    assert_eq!(first, second);
    assert!(!first.any_processing());
}

// ---------------------------------------------------------------------------
// Claiming and restart
// ---------------------------------------------------------------------------

/// A record with any step in `processing` cannot be claimed by a second run.
#[sqlx::test(migrations = "../db/migrations")]
async fn concurrent_claim_is_rejected(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    // Simulate a run in flight.
    VideoRepo::mark_step_processing(&pool, video_id, EnrichmentStep::Summary)
        .await
        .unwrap();

    let err = pipeline(&pool, ScriptedProvider::default())
        .enrich(video_id)
        .await
        .unwrap_err();
    assert_matches!(err, EnrichmentError::AlreadyRunning(id) if id == video_id);

    // The in-flight run's statuses were not disturbed.
    let status = statuses(&pool, video_id).await;
    assert_eq!(status[1], ProcessingState::Processing);
}

/// Enriching an unknown id fails without creating anything.
#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_video_is_not_found(pool: PgPool) {
    let err = pipeline(&pool, ScriptedProvider::default())
        .enrich(999_999)
        .await
        .unwrap_err();
    assert_matches!(err, EnrichmentError::NotFound(999_999));
}

/// A failed record can be re-enriched; the fresh run restarts from the
/// transcript and completes everything.
#[sqlx::test(migrations = "../db/migrations")]
async fn failed_record_can_be_rerun(pool: PgPool) {
    let video_id = seed_video(&pool).await;

    pipeline(&pool, ScriptedProvider::failing_at(Capability::Chapters))
        .enrich(video_id)
        .await
        .unwrap_err();

    let video = pipeline(&pool, ScriptedProvider::default())
        .enrich(video_id)
        .await
        .expect("re-run should succeed");
    assert!(video.processing_status().is_fully_completed());
}

/// A fully completed record is restarted unconditionally by a fresh run.
#[sqlx::test(migrations = "../db/migrations")]
async fn completed_record_is_restarted(pool: PgPool) {
    let video_id = seed_video(&pool).await;
    let pipeline = pipeline(&pool, ScriptedProvider::default());

    pipeline.enrich(video_id).await.unwrap();
    let video = pipeline.enrich(video_id).await.unwrap();
    assert!(video.processing_status().is_fully_completed());
}
