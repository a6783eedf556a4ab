//! Aggregate queries backing the channel dashboard.

use edutube_core::types::DbId;
use sqlx::PgPool;

use crate::models::dashboard::ChannelStats;

/// Read-only aggregate statistics.
pub struct DashboardRepo;

impl DashboardRepo {
    /// Channel statistics for one video owner.
    pub async fn channel_stats(pool: &PgPool, owner_id: DbId) -> Result<ChannelStats, sqlx::Error> {
        sqlx::query_as::<_, ChannelStats>(
            "SELECT
                (SELECT COUNT(*) FROM videos WHERE owner_id = $1) AS total_videos,
                (SELECT COALESCE(SUM(views), 0)::BIGINT FROM videos WHERE owner_id = $1) AS total_views,
                (SELECT COUNT(DISTINCT p.user_id)
                   FROM progress p JOIN videos v ON v.id = p.video_id
                  WHERE v.owner_id = $1) AS total_learners,
                (SELECT COUNT(*)
                   FROM progress p JOIN videos v ON v.id = p.video_id
                  WHERE v.owner_id = $1 AND p.completed) AS total_completions",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
    }
}
