//! Handlers for the `/videos` resource: listing, publishing, CRUD, and
//! per-user view counting.
//!
//! Mutating operations are owner-gated: the authenticated user's id must
//! equal the record's `owner_id`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use edutube_core::content::Difficulty;
use edutube_core::error::CoreError;
use edutube_core::types::DbId;
use edutube_db::models::video::{
    CreateVideo, UpdateVideo, Video, VideoDetailResponse, VideoFilter, VideoResponse,
};
use edutube_db::repositories::VideoRepo;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Default page size for listings.
const DEFAULT_LIMIT: i64 = 20;
/// Hard cap on page size.
const MAX_LIMIT: i64 = 100;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /videos`.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Case-insensitive substring match over title and description.
    pub q: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub owner_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Request body for `POST /videos`. The media files are already uploaded;
/// this publishes their metadata as a new record.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVideoRequest {
    #[validate(url(message = "video_file must be a valid URL"))]
    pub video_file: String,
    #[validate(url(message = "thumbnail must be a valid URL"))]
    pub thumbnail: String,
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1, max = 50, message = "category must be 1-50 characters"))]
    pub category: String,
    pub difficulty: Option<String>,
    #[validate(range(min = 0.1, message = "duration_secs must be positive"))]
    pub duration_secs: f64,
}

/// Request body for `PATCH /videos/{id}`. Only present fields are applied.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateVideoRequest {
    #[validate(length(min = 1, max = 200, message = "title must be 1-200 characters"))]
    pub title: Option<String>,
    #[validate(length(max = 5000, message = "description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 50, message = "category must be 1-50 characters"))]
    pub category: Option<String>,
    pub difficulty: Option<String>,
    #[validate(url(message = "thumbnail must be a valid URL"))]
    pub thumbnail: Option<String>,
    pub is_published: Option<bool>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/videos
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<DataResponse<Vec<VideoDetailResponse>>>> {
    let filter = VideoFilter {
        query: query.q,
        category: query.category,
        difficulty: query.difficulty.map(validate_difficulty).transpose()?,
        owner_id: query.owner_id,
        limit: query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        offset: query.offset.unwrap_or(0).max(0),
    };

    let rows = VideoRepo::list(&state.pool, &filter).await?;
    let videos = rows.into_iter().map(|row| row.into_response()).collect();
    Ok(Json(DataResponse { data: videos }))
}

/// POST /api/v1/videos
///
/// Publish a new video record. All four processing statuses start
/// `pending` and the derived content starts empty.
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateVideoRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<VideoResponse>>)> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;

    let difficulty = match input.difficulty {
        Some(raw) => validate_difficulty(raw)?,
        None => Difficulty::default().as_str().to_string(),
    };

    let video = VideoRepo::create(
        &state.pool,
        &CreateVideo {
            owner_id: user.user_id,
            video_file: input.video_file,
            thumbnail: input.thumbnail,
            title: input.title,
            description: input.description,
            category: input.category,
            difficulty,
            duration_secs: input.duration_secs,
        },
    )
    .await?;

    tracing::info!(video_id = video.id, owner_id = user.user_id, "video published");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: video.into() }),
    ))
}

/// GET /api/v1/videos/{id}
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VideoDetailResponse>>> {
    let row = VideoRepo::find_with_owner(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: row.into_response(),
    }))
}

/// PATCH /api/v1/videos/{id}  (owner only)
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateVideoRequest>,
) -> AppResult<Json<DataResponse<VideoResponse>>> {
    input
        .validate()
        .map_err(|e| AppError::Core(CoreError::Validation(e.to_string())))?;
    fetch_owned_video(&state, id, &user).await?;

    let update = UpdateVideo {
        title: input.title,
        description: input.description,
        category: input.category,
        difficulty: input.difficulty.map(validate_difficulty).transpose()?,
        thumbnail: input.thumbnail,
        is_published: input.is_published,
    };

    let video = VideoRepo::update(&state.pool, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;
    Ok(Json(DataResponse { data: video.into() }))
}

/// DELETE /api/v1/videos/{id}  (owner only)
///
/// Removes the whole record; progress rows cascade with it.
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    fetch_owned_video(&state, id, &user).await?;
    VideoRepo::delete(&state.pool, id).await?;
    tracing::info!(video_id = id, owner_id = user.user_id, "video deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/videos/{id}/publish  (owner only)
///
/// Toggle the publish flag.
pub async fn toggle_publish(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let video = fetch_owned_video(&state, id, &user).await?;
    let is_published = VideoRepo::set_published(&state.pool, id, !video.is_published)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: json!({ "is_published": is_published }),
    }))
}

/// POST /api/v1/videos/{id}/view
///
/// Record a view by the authenticated user. The counter increments only on
/// the user's first view.
pub async fn record_view(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    // Existence check first: the view insert references the video row.
    if VideoRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }));
    }

    let views = VideoRepo::record_view(&state.pool, id, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;
    Ok(Json(DataResponse {
        data: json!({ "views": views }),
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a video and require the given user to own it.
pub(crate) async fn fetch_owned_video(
    state: &AppState,
    id: DbId,
    user: &AuthUser,
) -> AppResult<Video> {
    let video = VideoRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Video",
            id,
        }))?;

    if video.owner_id != user.user_id {
        return Err(AppError::Core(CoreError::Forbidden(
            "You do not own this video".into(),
        )));
    }
    Ok(video)
}

/// Check a difficulty string against the known set.
fn validate_difficulty(raw: String) -> AppResult<String> {
    Difficulty::parse(&raw)
        .map(|d| d.as_str().to_string())
        .ok_or_else(|| {
            AppError::Core(CoreError::Validation(format!(
                "Unknown difficulty '{raw}'; expected beginner, intermediate, or advanced"
            )))
        })
}
