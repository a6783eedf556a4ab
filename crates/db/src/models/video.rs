//! Video entity model and DTOs.
//!
//! The four AI status columns are persisted as TEXT; [`Video::processing_status`]
//! assembles them into the typed map consumed by the pipeline and the API.

use edutube_core::content::{Chapter, QuizQuestion};
use edutube_core::processing::{ContentPresence, ProcessingState, ProcessingStatus};
use edutube_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// Full video row from the `videos` table.
#[derive(Debug, Clone, FromRow)]
pub struct Video {
    pub id: DbId,
    pub owner_id: DbId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub transcript: String,
    pub summary: String,
    pub chapters: Json<Vec<Chapter>>,
    pub quiz: Json<Vec<QuizQuestion>>,
    pub keywords: Json<Vec<String>>,
    pub learning_objectives: Json<Vec<String>>,
    pub transcript_status: String,
    pub summary_status: String,
    pub chapters_status: String,
    pub quiz_status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Video {
    /// Assemble the typed status map from the four status columns.
    ///
    /// The columns are CHECK-constrained to the enum values, so an
    /// unparseable value can only mean a migration gap; it degrades to
    /// `Pending` rather than failing the read.
    pub fn processing_status(&self) -> ProcessingStatus {
        ProcessingStatus {
            transcript: ProcessingState::parse(&self.transcript_status).unwrap_or_default(),
            summary: ProcessingState::parse(&self.summary_status).unwrap_or_default(),
            chapters: ProcessingState::parse(&self.chapters_status).unwrap_or_default(),
            quiz: ProcessingState::parse(&self.quiz_status).unwrap_or_default(),
        }
    }

    /// Which derived-content fields currently hold content.
    pub fn content_presence(&self) -> ContentPresence {
        ContentPresence {
            transcript: !self.transcript.is_empty(),
            summary: !self.summary.is_empty(),
            chapters: !self.chapters.0.is_empty(),
            quiz: !self.quiz.0.is_empty(),
        }
    }
}

/// API-facing video representation with the status map assembled.
#[derive(Debug, Clone, Serialize)]
pub struct VideoResponse {
    pub id: DbId,
    pub owner_id: DbId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub duration_secs: f64,
    pub views: i64,
    pub is_published: bool,
    pub transcript: String,
    pub summary: String,
    pub chapters: Vec<Chapter>,
    pub quiz: Vec<QuizQuestion>,
    pub keywords: Vec<String>,
    pub learning_objectives: Vec<String>,
    pub ai_processing_status: ProcessingStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Video> for VideoResponse {
    fn from(video: Video) -> Self {
        let ai_processing_status = video.processing_status();
        Self {
            id: video.id,
            owner_id: video.owner_id,
            video_file: video.video_file,
            thumbnail: video.thumbnail,
            title: video.title,
            description: video.description,
            category: video.category,
            difficulty: video.difficulty,
            duration_secs: video.duration_secs,
            views: video.views,
            is_published: video.is_published,
            transcript: video.transcript,
            summary: video.summary,
            chapters: video.chapters.0,
            quiz: video.quiz.0,
            keywords: video.keywords.0,
            learning_objectives: video.learning_objectives.0,
            ai_processing_status,
            created_at: video.created_at,
            updated_at: video.updated_at,
        }
    }
}

/// Public owner details joined onto video listings.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerSummary {
    pub id: DbId,
    pub username: String,
    pub full_name: String,
    pub avatar: String,
}

/// Video row joined with its owner's public details.
#[derive(Debug, Clone, FromRow)]
pub struct VideoWithOwner {
    #[sqlx(flatten)]
    pub video: Video,
    pub owner_username: String,
    pub owner_full_name: String,
    pub owner_avatar: String,
}

impl VideoWithOwner {
    pub fn into_response(self) -> VideoDetailResponse {
        let owner = OwnerSummary {
            id: self.video.owner_id,
            username: self.owner_username,
            full_name: self.owner_full_name,
            avatar: self.owner_avatar,
        };
        VideoDetailResponse {
            video: self.video.into(),
            owner,
        }
    }
}

/// Video plus owner, as served by the list and detail endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct VideoDetailResponse {
    #[serde(flatten)]
    pub video: VideoResponse,
    pub owner: OwnerSummary,
}

/// DTO for inserting a new video record. Derived content starts empty and
/// every status starts `pending` via column defaults.
#[derive(Debug)]
pub struct CreateVideo {
    pub owner_id: DbId,
    pub video_file: String,
    pub thumbnail: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub difficulty: String,
    pub duration_secs: f64,
}

/// DTO for updating authoring metadata. Only non-`None` fields are applied.
#[derive(Debug, Default)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
}

/// Filters for the video listing endpoint.
#[derive(Debug, Default)]
pub struct VideoFilter {
    /// Case-insensitive substring match over title and description.
    pub query: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub owner_id: Option<DbId>,
    pub limit: i64,
    pub offset: i64,
}
