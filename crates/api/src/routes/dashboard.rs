//! Route definitions for the `/dashboard` resource.
//!
//! ```text
//! GET /stats    -> stats
//! GET /videos   -> videos (own catalog)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::dashboard;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stats", get(dashboard::stats))
        .route("/videos", get(dashboard::videos))
}
