use std::sync::Arc;

use edutube_pipeline::EnrichmentPipeline;

use crate::config::ServerConfig;
use crate::notifications::Notifier;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: edutube_db::DbPool,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
    /// The AI enrichment pipeline.
    pub pipeline: EnrichmentPipeline,
    /// Outbound email notifications (welcome, learning milestones).
    pub notifier: Arc<dyn Notifier>,
}
