//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;
use edutube_core::error::CoreError;
use edutube_db::models::progress::ProgressListEntry;
use edutube_db::models::user::UserResponse;
use edutube_db::repositories::{ProgressRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
pub async fn me(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let record = UserRepo::find_by_id(&state.pool, user.user_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.user_id,
        }))?;
    Ok(Json(DataResponse {
        data: record.into(),
    }))
}

/// GET /api/v1/users/me/watch-history
///
/// The user's progress records joined with video metadata, most recently
/// watched first.
pub async fn watch_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<DataResponse<Vec<ProgressListEntry>>>> {
    let rows = ProgressRepo::list_for_user(&state.pool, user.user_id).await?;
    let entries = rows.into_iter().map(ProgressListEntry::from).collect();
    Ok(Json(DataResponse { data: entries }))
}
