//! Refresh-token session model.

use edutube_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// One refresh-token session. Dead once `revoked_at` is set or
/// `expires_at` has passed.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

/// DTO for creating a session row on login or token rotation.
#[derive(Debug)]
pub struct CreateSession {
    pub user_id: DbId,
    pub refresh_token_hash: String,
    pub expires_at: Timestamp,
}
