//! Request handlers, one module per resource.

pub mod ai;
pub mod auth;
pub mod dashboard;
pub mod progress;
pub mod users;
pub mod videos;
