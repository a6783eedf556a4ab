//! Progress entity model and response DTOs.

use edutube_core::progress::{
    self, Bookmark, Note, ProgressFacts, QuizAttempt,
};
use edutube_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full progress row from the `progress` table, unique per (user, video).
#[derive(Debug, Clone, FromRow)]
pub struct Progress {
    pub id: DbId,
    pub user_id: DbId,
    pub video_id: DbId,
    pub watch_time_secs: f64,
    pub completed: bool,
    pub last_watched: Timestamp,
    pub quiz_attempts: Json<Vec<QuizAttempt>>,
    pub notes: Json<Vec<Note>>,
    pub bookmarks: Json<Vec<Bookmark>>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Progress {
    pub fn average_quiz_score(&self) -> u32 {
        progress::average_quiz_score(&self.quiz_attempts.0)
    }

    /// The facts needed for aggregate learner statistics.
    pub fn facts(&self) -> ProgressFacts {
        ProgressFacts {
            completed: self.completed,
            watch_time_secs: self.watch_time_secs,
            average_quiz_score: self.average_quiz_score(),
            note_count: self.notes.0.len(),
            bookmark_count: self.bookmarks.0.len(),
        }
    }
}

/// Progress row joined with the video metadata needed for listings and
/// watch history.
#[derive(Debug, Clone, FromRow)]
pub struct ProgressWithVideo {
    #[sqlx(flatten)]
    pub progress: Progress,
    pub video_title: String,
    pub video_thumbnail: String,
    pub video_duration_secs: f64,
    pub video_category: String,
    pub video_difficulty: String,
}

/// API-facing progress representation with derived values included.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub id: DbId,
    pub user_id: DbId,
    pub video_id: DbId,
    pub watch_time_secs: f64,
    pub completed: bool,
    pub last_watched: Timestamp,
    pub quiz_attempts: Vec<QuizAttempt>,
    pub notes: Vec<Note>,
    pub bookmarks: Vec<Bookmark>,
    pub completion_percentage: u32,
    pub average_quiz_score: u32,
}

impl ProgressResponse {
    /// Build the response; derived values need the video's current duration.
    pub fn from_record(record: Progress, duration_secs: f64) -> Self {
        let average_quiz_score = record.average_quiz_score();
        Self {
            id: record.id,
            user_id: record.user_id,
            video_id: record.video_id,
            watch_time_secs: record.watch_time_secs,
            completed: record.completed,
            last_watched: record.last_watched,
            quiz_attempts: record.quiz_attempts.0,
            notes: record.notes.0,
            bookmarks: record.bookmarks.0,
            completion_percentage: progress::completion_percentage(
                record.watch_time_secs,
                duration_secs,
            ),
            average_quiz_score,
        }
    }
}

/// One watch-history / progress-listing entry.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressListEntry {
    pub video_id: DbId,
    pub video_title: String,
    pub video_thumbnail: String,
    pub video_category: String,
    pub video_difficulty: String,
    pub video_duration_secs: f64,
    pub watch_time_secs: f64,
    pub completed: bool,
    pub completion_percentage: u32,
    pub average_quiz_score: u32,
    pub note_count: usize,
    pub bookmark_count: usize,
    pub last_watched: Timestamp,
}

impl From<ProgressWithVideo> for ProgressListEntry {
    fn from(row: ProgressWithVideo) -> Self {
        Self {
            video_id: row.progress.video_id,
            video_title: row.video_title,
            video_thumbnail: row.video_thumbnail,
            video_category: row.video_category,
            video_difficulty: row.video_difficulty,
            video_duration_secs: row.video_duration_secs,
            watch_time_secs: row.progress.watch_time_secs,
            completed: row.progress.completed,
            completion_percentage: progress::completion_percentage(
                row.progress.watch_time_secs,
                row.video_duration_secs,
            ),
            average_quiz_score: row.progress.average_quiz_score(),
            note_count: row.progress.notes.0.len(),
            bookmark_count: row.progress.bookmarks.0.len(),
            last_watched: row.progress.last_watched,
        }
    }
}
