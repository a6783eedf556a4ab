//! Handlers for the `/ai` resource: running the enrichment pipeline and
//! serving its derived content.

use axum::extract::{Path, State};
use axum::Json;
use edutube_core::error::CoreError;
use edutube_core::processing::ProcessingStatus;
use edutube_core::types::DbId;
use edutube_db::models::video::{Video, VideoResponse};
use edutube_db::repositories::VideoRepo;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::handlers::videos::fetch_owned_video;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/ai/videos/{id}/process  (owner only)
///
/// Run the enrichment pipeline to completion and return the enriched
/// record. A concurrent run on the same video is rejected with 409; a
/// provider failure reconciles the status map and surfaces as 500 with the
/// root cause in the message.
pub async fn process_video(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoResponse>>> {
    fetch_owned_video(&state, id, &user).await?;

    let video = state.pipeline.enrich(id).await?;
    Ok(Json(DataResponse { data: video.into() }))
}

/// GET /api/v1/ai/videos/{id}/status
pub async fn processing_status(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProcessingStatus>>> {
    let status = state.pipeline.status(id).await?;
    Ok(Json(DataResponse { data: status }))
}

/// GET /api/v1/ai/videos/{id}/transcript
pub async fn transcript(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let video = fetch_video(&state, id).await?;
    Ok(Json(DataResponse {
        data: json!({ "transcript": video.transcript }),
    }))
}

/// GET /api/v1/ai/videos/{id}/summary
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let video = fetch_video(&state, id).await?;
    Ok(Json(DataResponse {
        data: json!({ "summary": video.summary }),
    }))
}

/// GET /api/v1/ai/videos/{id}/chapters
pub async fn chapters(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let video = fetch_video(&state, id).await?;
    Ok(Json(DataResponse {
        data: json!({ "chapters": video.chapters.0 }),
    }))
}

/// GET /api/v1/ai/videos/{id}/quiz
pub async fn quiz(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let video = fetch_video(&state, id).await?;
    Ok(Json(DataResponse {
        data: json!({ "quiz": video.quiz.0 }),
    }))
}

/// GET /api/v1/ai/videos/{id}/insights
///
/// Every derived field plus the status map, in one response.
pub async fn insights(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let video = fetch_video(&state, id).await?;
    let status = video.processing_status();
    Ok(Json(DataResponse {
        data: json!({
            "summary": video.summary,
            "chapters": video.chapters.0,
            "quiz": video.quiz.0,
            "keywords": video.keywords.0,
            "learning_objectives": video.learning_objectives.0,
            "ai_processing_status": status,
        }),
    }))
}

async fn fetch_video(state: &AppState, id: DbId) -> AppResult<Video> {
    VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))
}
