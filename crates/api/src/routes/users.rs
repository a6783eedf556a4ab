//! Route definitions for the `/users` resource.
//!
//! ```text
//! GET /me                    -> me
//! GET /me/watch-history      -> watch_history
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(users::me))
        .route("/me/watch-history", get(users::watch_history))
}
