//! Aggregate dashboard models.

use serde::Serialize;
use sqlx::FromRow;

/// Channel-level statistics for a video owner.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChannelStats {
    pub total_videos: i64,
    pub total_views: i64,
    /// Distinct users with a progress record on any of the owner's videos.
    pub total_learners: i64,
    /// Completed (user, video) pairs across the owner's catalog.
    pub total_completions: i64,
}
