//! Repository for the `progress` table.
//!
//! Progress rows are created lazily on the first progress-affecting action
//! for a (user, video) pair; every mutation is an upsert so callers never
//! need a separate existence check. Quiz attempts, notes, and bookmarks
//! are appended with the JSONB `||` operator -- a single atomic statement
//! that never rewrites prior entries.

use edutube_core::progress::{Bookmark, Note, QuizAttempt};
use edutube_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::progress::{Progress, ProgressWithVideo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, video_id, watch_time_secs, completed, last_watched, \
                       quiz_attempts, notes, bookmarks, created_at, updated_at";

/// Provides persistence for per-user learning progress.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Record a watch-time observation: last-write-wins on `watch_time_secs`,
    /// sticky on `completed` (once true, a smaller fraction never resets it).
    ///
    /// `completed` is the caller's evaluation of the new watch time against
    /// the video's current duration.
    pub async fn upsert_watch_time(
        pool: &PgPool,
        user_id: DbId,
        video_id: DbId,
        watch_time_secs: f64,
        completed: bool,
    ) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (user_id, video_id, watch_time_secs, completed, last_watched)
             VALUES ($1, $2, $3, $4, NOW())
             ON CONFLICT (user_id, video_id) DO UPDATE SET
                watch_time_secs = EXCLUDED.watch_time_secs,
                completed = progress.completed OR EXCLUDED.completed,
                last_watched = NOW(),
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(video_id)
            .bind(watch_time_secs)
            .bind(completed)
            .fetch_one(pool)
            .await
    }

    /// Append a quiz attempt. Prior attempts are never mutated or removed.
    pub async fn append_quiz_attempt(
        pool: &PgPool,
        user_id: DbId,
        video_id: DbId,
        attempt: &QuizAttempt,
    ) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (user_id, video_id, quiz_attempts)
             VALUES ($1, $2, jsonb_build_array($3::jsonb))
             ON CONFLICT (user_id, video_id) DO UPDATE SET
                quiz_attempts = progress.quiz_attempts || EXCLUDED.quiz_attempts,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(video_id)
            .bind(Json(attempt))
            .fetch_one(pool)
            .await
    }

    /// Append a note. No dedup, no size cap.
    pub async fn append_note(
        pool: &PgPool,
        user_id: DbId,
        video_id: DbId,
        note: &Note,
    ) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (user_id, video_id, notes)
             VALUES ($1, $2, jsonb_build_array($3::jsonb))
             ON CONFLICT (user_id, video_id) DO UPDATE SET
                notes = progress.notes || EXCLUDED.notes,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(video_id)
            .bind(Json(note))
            .fetch_one(pool)
            .await
    }

    /// Append a bookmark. No dedup, no size cap.
    pub async fn append_bookmark(
        pool: &PgPool,
        user_id: DbId,
        video_id: DbId,
        bookmark: &Bookmark,
    ) -> Result<Progress, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress (user_id, video_id, bookmarks)
             VALUES ($1, $2, jsonb_build_array($3::jsonb))
             ON CONFLICT (user_id, video_id) DO UPDATE SET
                bookmarks = progress.bookmarks || EXCLUDED.bookmarks,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(video_id)
            .bind(Json(bookmark))
            .fetch_one(pool)
            .await
    }

    /// Find the progress record for one (user, video) pair.
    pub async fn find_for_user_video(
        pool: &PgPool,
        user_id: DbId,
        video_id: DbId,
    ) -> Result<Option<Progress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress WHERE user_id = $1 AND video_id = $2");
        sqlx::query_as::<_, Progress>(&query)
            .bind(user_id)
            .bind(video_id)
            .fetch_optional(pool)
            .await
    }

    /// List all of a user's progress records with video metadata joined,
    /// most recently watched first. Also serves the watch history view.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<ProgressWithVideo>, sqlx::Error> {
        sqlx::query_as::<_, ProgressWithVideo>(
            "SELECT p.*,
                    v.title AS video_title,
                    v.thumbnail AS video_thumbnail,
                    v.duration_secs AS video_duration_secs,
                    v.category AS video_category,
                    v.difficulty AS video_difficulty
             FROM progress p JOIN videos v ON v.id = p.video_id
             WHERE p.user_id = $1
             ORDER BY p.last_watched DESC, p.id DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Count the user's completed videos across all progress records.
    pub async fn count_completed_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM progress WHERE user_id = $1 AND completed")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
