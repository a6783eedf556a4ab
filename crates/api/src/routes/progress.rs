//! Route definitions for the `/progress` resource.
//!
//! ```text
//! GET  /                        -> overview (records + stats)
//! GET  /videos/{id}             -> get_for_video
//! POST /videos/{id}/watch       -> record_watch_time
//! POST /videos/{id}/quiz        -> submit_quiz
//! POST /videos/{id}/notes       -> add_note
//! POST /videos/{id}/bookmarks   -> add_bookmark
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progress;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(progress::overview))
        .route("/videos/{id}", get(progress::get_for_video))
        .route("/videos/{id}/watch", post(progress::record_watch_time))
        .route("/videos/{id}/quiz", post(progress::submit_quiz))
        .route("/videos/{id}/notes", post(progress::add_note))
        .route("/videos/{id}/bookmarks", post(progress::add_bookmark))
}
