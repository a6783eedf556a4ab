//! Handlers for the `/dashboard` resource: channel statistics and the
//! owner's own catalog.

use axum::extract::State;
use axum::Json;
use edutube_db::models::dashboard::ChannelStats;
use edutube_db::models::video::VideoResponse;
use edutube_db::repositories::{DashboardRepo, VideoRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/dashboard/stats
pub async fn stats(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<ChannelStats>>> {
    let stats = DashboardRepo::channel_stats(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse { data: stats }))
}

/// GET /api/v1/dashboard/videos
///
/// The authenticated user's videos, newest first.
pub async fn videos(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<VideoResponse>>>> {
    let rows = VideoRepo::list_by_owner(&state.pool, user.user_id).await?;
    let videos = rows.into_iter().map(VideoResponse::from).collect();
    Ok(Json(DataResponse { data: videos }))
}
