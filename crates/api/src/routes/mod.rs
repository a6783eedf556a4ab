//! Route tree, one module per resource.

pub mod ai;
pub mod auth;
pub mod dashboard;
pub mod health;
pub mod progress;
pub mod users;
pub mod videos;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                      register (public)
/// /auth/login                         login (public)
/// /auth/refresh                       refresh (public)
/// /auth/logout                        logout (requires auth)
///
/// /users/me                           current user
/// /users/me/watch-history             watch history, most recent first
///
/// /videos                             list, create
/// /videos/{id}                        get, update, delete
/// /videos/{id}/publish                toggle publish flag (POST)
/// /videos/{id}/view                   record a per-user view (POST)
///
/// /ai/videos/{id}/process             run the enrichment pipeline (POST)
/// /ai/videos/{id}/status              processing status map
/// /ai/videos/{id}/transcript          derived content getters
/// /ai/videos/{id}/summary
/// /ai/videos/{id}/chapters
/// /ai/videos/{id}/quiz
/// /ai/videos/{id}/insights            all derived fields + status map
///
/// /progress                           learner overview (records + stats)
/// /progress/videos/{id}               progress for one video
/// /progress/videos/{id}/watch         record watch time (POST)
/// /progress/videos/{id}/quiz          submit a quiz attempt (POST)
/// /progress/videos/{id}/notes         append a note (POST)
/// /progress/videos/{id}/bookmarks     append a bookmark (POST)
///
/// /dashboard/stats                    channel statistics
/// /dashboard/videos                   own catalog, newest first
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/videos", videos::router())
        .nest("/ai", ai::router())
        .nest("/progress", progress::router())
        .nest("/dashboard", dashboard::router())
}
