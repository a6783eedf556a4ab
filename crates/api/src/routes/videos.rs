//! Route definitions for the `/videos` resource.
//!
//! ```text
//! GET    /              -> list
//! POST   /              -> create
//! GET    /{id}          -> get
//! PATCH  /{id}          -> update       (owner only)
//! DELETE /{id}          -> delete       (owner only)
//! POST   /{id}/publish  -> toggle_publish (owner only)
//! POST   /{id}/view     -> record_view
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::videos;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(videos::list).post(videos::create))
        .route(
            "/{id}",
            get(videos::get)
                .patch(videos::update)
                .delete(videos::delete),
        )
        .route("/{id}/publish", post(videos::toggle_publish))
        .route("/{id}/view", post(videos::record_view))
}
