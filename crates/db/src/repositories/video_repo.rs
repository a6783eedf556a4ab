//! Repository for the `videos` table.
//!
//! Besides CRUD, this hosts the enrichment pipeline's persistence: the
//! claim write, per-step status transitions, content writes, and the
//! reconciliation write. Every write sets absolute values in a single
//! statement, so a retried write is harmless.

use edutube_core::content::{Chapter, QuizQuestion};
use edutube_core::processing::{EnrichmentStep, ProcessingStatus};
use edutube_core::types::DbId;
use sqlx::types::Json;
use sqlx::{PgPool, QueryBuilder};

use crate::models::video::{CreateVideo, UpdateVideo, Video, VideoFilter, VideoWithOwner};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, video_file, thumbnail, title, description, category, \
                       difficulty, duration_secs, views, is_published, transcript, summary, \
                       chapters, quiz, keywords, learning_objectives, transcript_status, \
                       summary_status, chapters_status, quiz_status, created_at, updated_at";

/// Owner columns joined onto listing queries.
const OWNER_JOIN: &str = "u.username AS owner_username, u.full_name AS owner_full_name, \
                          u.avatar AS owner_avatar";

/// Provides CRUD and enrichment persistence for videos.
pub struct VideoRepo;

impl VideoRepo {
    /// Insert a new video record. Derived content starts empty and all four
    /// statuses start `pending` via column defaults.
    pub async fn create(pool: &PgPool, input: &CreateVideo) -> Result<Video, sqlx::Error> {
        let query = format!(
            "INSERT INTO videos
                 (owner_id, video_file, thumbnail, title, description, category, difficulty, duration_secs)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(input.owner_id)
            .bind(&input.video_file)
            .bind(&input.thumbnail)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.difficulty)
            .bind(input.duration_secs)
            .fetch_one(pool)
            .await
    }

    /// Find a video by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Video>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM videos WHERE id = $1");
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a video with its owner's public details joined.
    pub async fn find_with_owner(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VideoWithOwner>, sqlx::Error> {
        let query = format!(
            "SELECT v.*, {OWNER_JOIN}
             FROM videos v JOIN users u ON u.id = v.owner_id
             WHERE v.id = $1"
        );
        sqlx::query_as::<_, VideoWithOwner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List videos matching the filter, newest first, owners joined.
    pub async fn list(
        pool: &PgPool,
        filter: &VideoFilter,
    ) -> Result<Vec<VideoWithOwner>, sqlx::Error> {
        let mut qb = QueryBuilder::new(format!(
            "SELECT v.*, {OWNER_JOIN} FROM videos v JOIN users u ON u.id = v.owner_id WHERE TRUE"
        ));

        if let Some(query) = &filter.query {
            let pattern = format!("%{query}%");
            qb.push(" AND (v.title ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR v.description ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(category) = &filter.category {
            qb.push(" AND v.category = ").push_bind(category.clone());
        }
        if let Some(difficulty) = &filter.difficulty {
            qb.push(" AND v.difficulty = ").push_bind(difficulty.clone());
        }
        if let Some(owner_id) = filter.owner_id {
            qb.push(" AND v.owner_id = ").push_bind(owner_id);
        }

        qb.push(" ORDER BY v.created_at DESC, v.id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        qb.build_query_as::<VideoWithOwner>().fetch_all(pool).await
    }

    /// List all of an owner's videos, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Video>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM videos WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update authoring metadata. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateVideo,
    ) -> Result<Option<Video>, sqlx::Error> {
        let query = format!(
            "UPDATE videos SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                category = COALESCE($4, category),
                difficulty = COALESCE($5, difficulty),
                thumbnail = COALESCE($6, thumbnail),
                is_published = COALESCE($7, is_published),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Video>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.category)
            .bind(&input.difficulty)
            .bind(&input.thumbnail)
            .bind(input.is_published)
            .fetch_optional(pool)
            .await
    }

    /// Set the publish flag. Returns the new value, or `None` if absent.
    pub async fn set_published(
        pool: &PgPool,
        id: DbId,
        is_published: bool,
    ) -> Result<Option<bool>, sqlx::Error> {
        sqlx::query_scalar(
            "UPDATE videos SET is_published = $2, updated_at = NOW()
             WHERE id = $1 RETURNING is_published",
        )
        .bind(id)
        .bind(is_published)
        .fetch_optional(pool)
        .await
    }

    /// Delete a video record outright. Progress rows cascade.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Record a view by a user. The counter increments only on the user's
    /// first view; repeat views leave it untouched.
    ///
    /// Returns the current view count, or `None` if the video is absent.
    pub async fn record_view(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "WITH new_view AS (
                 INSERT INTO video_views (video_id, user_id)
                 VALUES ($1, $2)
                 ON CONFLICT (video_id, user_id) DO NOTHING
                 RETURNING 1
             )
             UPDATE videos
             SET views = views + (SELECT COUNT(*) FROM new_view)
             WHERE id = $1
             RETURNING views",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    // -----------------------------------------------------------------------
    // Enrichment pipeline writes
    // -----------------------------------------------------------------------

    /// Claim a video for an enrichment run: transcript goes `processing`,
    /// the remaining statuses reset to `pending`.
    ///
    /// The claim is conditional on no status field currently being
    /// `processing`, which gives concurrent runs on the same record a
    /// single-flight guard. Returns `false` when another run holds the
    /// record (or the id does not exist).
    pub async fn begin_enrichment(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE videos SET
                transcript_status = 'processing',
                summary_status = 'pending',
                chapters_status = 'pending',
                quiz_status = 'pending',
                updated_at = NOW()
             WHERE id = $1
               AND transcript_status <> 'processing'
               AND summary_status <> 'processing'
               AND chapters_status <> 'processing'
               AND quiz_status <> 'processing'",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Mark one step's status `processing` ahead of its provider call.
    pub async fn mark_step_processing(
        pool: &PgPool,
        id: DbId,
        step: EnrichmentStep,
    ) -> Result<(), sqlx::Error> {
        let column = status_column(step);
        let query =
            format!("UPDATE videos SET {column} = 'processing', updated_at = NOW() WHERE id = $1");
        sqlx::query(&query).bind(id).execute(pool).await?;
        Ok(())
    }

    /// Store the generated transcript and mark its status `completed`.
    pub async fn set_transcript(
        pool: &PgPool,
        id: DbId,
        transcript: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE videos SET transcript = $2, transcript_status = 'completed', updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(transcript)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the generated summary and mark its status `completed`.
    pub async fn set_summary(pool: &PgPool, id: DbId, summary: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE videos SET summary = $2, summary_status = 'completed', updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(summary)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the detected chapters and mark their status `completed`.
    pub async fn set_chapters(
        pool: &PgPool,
        id: DbId,
        chapters: &[Chapter],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE videos SET chapters = $2, chapters_status = 'completed', updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(Json(chapters))
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store the generated quiz and mark its status `completed`.
    pub async fn set_quiz(
        pool: &PgPool,
        id: DbId,
        quiz: &[QuizQuestion],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE videos SET quiz = $2, quiz_status = 'completed', updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(Json(quiz))
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Store keywords and learning objectives in one write. These two carry
    /// no status fields of their own.
    pub async fn set_keywords_and_objectives(
        pool: &PgPool,
        id: DbId,
        keywords: &[String],
        learning_objectives: &[String],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE videos SET keywords = $2, learning_objectives = $3, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(Json(keywords))
        .bind(Json(learning_objectives))
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Overwrite all four status fields in one write (the reconciliation
    /// pass after an aborted run).
    pub async fn set_statuses(
        pool: &PgPool,
        id: DbId,
        status: &ProcessingStatus,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE videos SET
                transcript_status = $2,
                summary_status = $3,
                chapters_status = $4,
                quiz_status = $5,
                updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(status.transcript.as_str())
        .bind(status.summary.as_str())
        .bind(status.chapters.as_str())
        .bind(status.quiz.as_str())
        .execute(pool)
        .await?;
        Ok(())
    }
}

/// Status column name for a pipeline step. Column names are static, never
/// user input.
fn status_column(step: EnrichmentStep) -> &'static str {
    match step {
        EnrichmentStep::Transcript => "transcript_status",
        EnrichmentStep::Summary => "summary_status",
        EnrichmentStep::Chapters => "chapters_status",
        EnrichmentStep::Quiz => "quiz_status",
    }
}
