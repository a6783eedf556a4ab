//! Handlers for the `/progress` resource: watch time, quiz attempts,
//! notes, bookmarks, and the learner overview.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use edutube_core::error::CoreError;
use edutube_core::progress::{
    self, Bookmark, LearnerStats, Milestone, Note, QuizAttempt,
};
use edutube_core::types::DbId;
use edutube_db::models::progress::{ProgressListEntry, ProgressResponse};
use edutube_db::models::video::Video;
use edutube_db::repositories::{ProgressRepo, UserRepo, VideoRepo};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /progress/videos/{id}/watch`.
#[derive(Debug, Deserialize, Validate)]
pub struct WatchRequest {
    /// Current watch position in seconds. Last write wins; this is not a
    /// delta.
    #[validate(range(min = 0.0, message = "watch_time_secs must not be negative"))]
    pub watch_time_secs: f64,
}

/// Request body for `POST /progress/videos/{id}/quiz`.
#[derive(Debug, Deserialize)]
pub struct QuizSubmission {
    /// Chosen option index per question, in question order.
    pub answers: Vec<usize>,
}

/// Request body for `POST /progress/videos/{id}/notes`.
#[derive(Debug, Deserialize, Validate)]
pub struct NoteRequest {
    #[validate(length(min = 1, max = 2000, message = "content must be 1-2000 characters"))]
    pub content: String,
    #[serde(default)]
    pub chapter_index: u32,
}

/// Request body for `POST /progress/videos/{id}/bookmarks`.
#[derive(Debug, Deserialize, Validate)]
pub struct BookmarkRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(range(min = 0.0, message = "time_in_video must not be negative"))]
    pub time_in_video: f64,
    #[serde(default)]
    pub note: String,
}

/// Grading result plus the updated progress, returned by quiz submission.
#[derive(Debug, Serialize)]
pub struct QuizResult {
    pub score: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub average_quiz_score: u32,
}

/// All of a user's progress records plus aggregate statistics.
#[derive(Debug, Serialize)]
pub struct ProgressOverview {
    pub records: Vec<ProgressListEntry>,
    pub stats: LearnerStats,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/progress/videos/{id}/watch
///
/// Record a watch-time observation. Completion is evaluated against the
/// video's duration fetched fresh on every call and is sticky once set.
/// Afterwards the user's completed-video count is checked against the
/// learning milestones; hitting one fires a congratulation email.
pub async fn record_watch_time(
    State(state): State<AppState>,
    user: AuthUser,
    Path(video_id): Path<DbId>,
    Json(input): Json<WatchRequest>,
) -> AppResult<Json<DataResponse<ProgressResponse>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    let video = fetch_video(&state, video_id).await?;

    let completed = progress::is_completed(input.watch_time_secs, video.duration_secs);
    let record = ProgressRepo::upsert_watch_time(
        &state.pool,
        user.user_id,
        video_id,
        input.watch_time_secs,
        completed,
    )
    .await?;

    check_milestones(&state, user.user_id).await;

    Ok(Json(DataResponse {
        data: ProgressResponse::from_record(record, video.duration_secs),
    }))
}

/// POST /api/v1/progress/videos/{id}/quiz
///
/// Grade a submission against the video's stored quiz and append the
/// attempt. Prior attempts are never touched.
pub async fn submit_quiz(
    State(state): State<AppState>,
    user: AuthUser,
    Path(video_id): Path<DbId>,
    Json(input): Json<QuizSubmission>,
) -> AppResult<Json<DataResponse<QuizResult>>> {
    let video = fetch_video(&state, video_id).await?;
    if video.quiz.0.is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "No quiz has been generated for this video".into(),
        )));
    }

    let score = progress::score_quiz(&video.quiz.0, &input.answers);
    let attempt = QuizAttempt {
        score: score.score,
        questions_answered: score.total_questions,
        correct_answers: score.correct_answers,
        timestamp: Utc::now(),
    };

    let record =
        ProgressRepo::append_quiz_attempt(&state.pool, user.user_id, video_id, &attempt).await?;

    Ok(Json(DataResponse {
        data: QuizResult {
            score: score.score,
            total_questions: score.total_questions,
            correct_answers: score.correct_answers,
            average_quiz_score: record.average_quiz_score(),
        },
    }))
}

/// POST /api/v1/progress/videos/{id}/notes
pub async fn add_note(
    State(state): State<AppState>,
    user: AuthUser,
    Path(video_id): Path<DbId>,
    Json(input): Json<NoteRequest>,
) -> AppResult<Json<DataResponse<ProgressResponse>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    let video = fetch_video(&state, video_id).await?;

    let note = Note {
        content: input.content,
        chapter_index: input.chapter_index,
        timestamp: Utc::now(),
    };
    let record = ProgressRepo::append_note(&state.pool, user.user_id, video_id, &note).await?;

    Ok(Json(DataResponse {
        data: ProgressResponse::from_record(record, video.duration_secs),
    }))
}

/// POST /api/v1/progress/videos/{id}/bookmarks
pub async fn add_bookmark(
    State(state): State<AppState>,
    user: AuthUser,
    Path(video_id): Path<DbId>,
    Json(input): Json<BookmarkRequest>,
) -> AppResult<Json<DataResponse<ProgressResponse>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    let video = fetch_video(&state, video_id).await?;

    let bookmark = Bookmark {
        title: input.title,
        time_in_video: input.time_in_video,
        note: input.note,
        timestamp: Utc::now(),
    };
    let record =
        ProgressRepo::append_bookmark(&state.pool, user.user_id, video_id, &bookmark).await?;

    Ok(Json(DataResponse {
        data: ProgressResponse::from_record(record, video.duration_secs),
    }))
}

/// GET /api/v1/progress/videos/{id}
pub async fn get_for_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(video_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProgressResponse>>> {
    let video = fetch_video(&state, video_id).await?;
    let record = ProgressRepo::find_for_user_video(&state.pool, user.user_id, video_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Progress",
            id: video_id,
        }))?;

    Ok(Json(DataResponse {
        data: ProgressResponse::from_record(record, video.duration_secs),
    }))
}

/// GET /api/v1/progress
///
/// Every progress record the user has, plus aggregate learner statistics.
pub async fn overview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ProgressOverview>>> {
    let rows = ProgressRepo::list_for_user(&state.pool, user.user_id).await?;
    let facts: Vec<_> = rows.iter().map(|row| row.progress.facts()).collect();
    let stats = LearnerStats::from_records(&facts);
    let records = rows.into_iter().map(ProgressListEntry::from).collect();

    Ok(Json(DataResponse {
        data: ProgressOverview { records, stats },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn fetch_video(state: &AppState, id: DbId) -> AppResult<Video> {
    VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))
}

/// Fire a milestone email if the user's live completed-video count sits
/// exactly on a milestone. Delivery failures are logged, never surfaced.
async fn check_milestones(state: &AppState, user_id: DbId) {
    let count = match ProgressRepo::count_completed_for_user(&state.pool, user_id).await {
        Ok(count) => count,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "failed to count completed videos");
            return;
        }
    };

    let Some(milestone) = Milestone::for_completed_count(count) else {
        return;
    };

    let user = match UserRepo::find_by_id(&state.pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return,
        Err(e) => {
            tracing::warn!(user_id, error = %e, "failed to load user for milestone email");
            return;
        }
    };

    tracing::info!(user_id, milestone = milestone.title, "learning milestone reached");
    if let Err(e) = state
        .notifier
        .send_milestone(&user.email, &user.full_name, &milestone)
        .await
    {
        tracing::warn!(user_id, error = %e, "failed to send milestone email");
    }
}
