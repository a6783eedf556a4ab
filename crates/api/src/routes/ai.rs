//! Route definitions for the `/ai` resource.
//!
//! ```text
//! POST /videos/{id}/process     -> process_video (owner only)
//! GET  /videos/{id}/status      -> processing_status
//! GET  /videos/{id}/transcript  -> transcript
//! GET  /videos/{id}/summary     -> summary
//! GET  /videos/{id}/chapters    -> chapters
//! GET  /videos/{id}/quiz        -> quiz
//! GET  /videos/{id}/insights    -> insights
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ai;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/videos/{id}/process", post(ai::process_video))
        .route("/videos/{id}/status", get(ai::processing_status))
        .route("/videos/{id}/transcript", get(ai::transcript))
        .route("/videos/{id}/summary", get(ai::summary))
        .route("/videos/{id}/chapters", get(ai::chapters))
        .route("/videos/{id}/quiz", get(ai::quiz))
        .route("/videos/{id}/insights", get(ai::insights))
}
