//! The enrichment orchestrator.
//!
//! One [`EnrichmentPipeline::enrich`] call runs the strictly ordered step
//! sequence transcript -> summary -> chapters -> quiz, then the concurrent
//! keyword/objective pair. Each status transition is durably persisted
//! before the next provider call is issued, so a concurrent reader polling
//! the record only ever observes defined states.

use std::sync::Arc;

use edutube_ai::ContentProvider;
use edutube_core::processing::{self, EnrichmentStep, ProcessingStatus};
use edutube_core::types::DbId;
use edutube_db::models::video::Video;
use edutube_db::repositories::VideoRepo;
use edutube_db::DbPool;

use crate::error::EnrichmentError;

/// Orchestrates AI enrichment runs against the record store.
///
/// Cheap to clone; the provider is shared behind an `Arc`.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    pool: DbPool,
    provider: Arc<dyn ContentProvider>,
}

impl EnrichmentPipeline {
    pub fn new(pool: DbPool, provider: Arc<dyn ContentProvider>) -> Self {
        Self { pool, provider }
    }

    /// Run the full enrichment sequence for one video.
    ///
    /// The record is claimed with a conditional write before any provider
    /// call: if any status field is currently `processing`, another run
    /// holds the record and this call fails with
    /// [`EnrichmentError::AlreadyRunning`] without touching it. A record
    /// in any settled state (fresh, failed, or fully completed) is
    /// re-enriched from the first step.
    ///
    /// On the first failed step the remaining sequence is abandoned and
    /// every status field is reconciled in one write from current
    /// content-field emptiness, so a client polling the status map settles
    /// on a stable completed/failed split. The triggering error is then
    /// returned to the caller; no retry is scheduled.
    pub async fn enrich(&self, video_id: DbId) -> Result<Video, EnrichmentError> {
        let video = VideoRepo::find_by_id(&self.pool, video_id)
            .await?
            .ok_or(EnrichmentError::NotFound(video_id))?;

        if !VideoRepo::begin_enrichment(&self.pool, video_id).await? {
            return Err(EnrichmentError::AlreadyRunning(video_id));
        }

        match self.run_steps(video_id, &video.video_file).await {
            Ok(()) => {
                let enriched = VideoRepo::find_by_id(&self.pool, video_id)
                    .await?
                    .ok_or(EnrichmentError::NotFound(video_id))?;
                tracing::info!(video_id, "enrichment completed");
                Ok(enriched)
            }
            Err(err) => {
                tracing::warn!(video_id, error = %err, "enrichment aborted, reconciling statuses");
                if let Err(reconcile_err) = self.reconcile(video_id).await {
                    // The original failure is the more useful signal; the
                    // statuses stay on whatever was last persisted.
                    tracing::error!(video_id, error = %reconcile_err, "status reconciliation failed");
                }
                Err(err)
            }
        }
    }

    /// Current status map for a video. Read-only.
    pub async fn status(&self, video_id: DbId) -> Result<ProcessingStatus, EnrichmentError> {
        let video = VideoRepo::find_by_id(&self.pool, video_id)
            .await?
            .ok_or(EnrichmentError::NotFound(video_id))?;
        Ok(video.processing_status())
    }

    /// The ordered step sequence. Returns at the first failed step; the
    /// caller owns reconciliation.
    async fn run_steps(&self, video_id: DbId, media_url: &str) -> Result<(), EnrichmentError> {
        // Step 1: transcript. The claim write already set its status to
        // `processing`.
        let transcript = self
            .provider
            .generate_transcript(media_url)
            .await
            .map_err(|source| EnrichmentError::Step {
                step: EnrichmentStep::Transcript,
                source,
            })?;
        VideoRepo::set_transcript(&self.pool, video_id, &transcript).await?;

        // Step 2: summary, from the transcript.
        VideoRepo::mark_step_processing(&self.pool, video_id, EnrichmentStep::Summary).await?;
        let summary = self
            .provider
            .generate_summary(&transcript)
            .await
            .map_err(|source| EnrichmentError::Step {
                step: EnrichmentStep::Summary,
                source,
            })?;
        VideoRepo::set_summary(&self.pool, video_id, &summary).await?;

        // Step 3: chapters, from the transcript.
        VideoRepo::mark_step_processing(&self.pool, video_id, EnrichmentStep::Chapters).await?;
        let chapters = self
            .provider
            .detect_chapters(&transcript)
            .await
            .map_err(|source| EnrichmentError::Step {
                step: EnrichmentStep::Chapters,
                source,
            })?;
        VideoRepo::set_chapters(&self.pool, video_id, &chapters).await?;

        // Step 4: quiz, from the transcript.
        VideoRepo::mark_step_processing(&self.pool, video_id, EnrichmentStep::Quiz).await?;
        let quiz = self
            .provider
            .generate_quiz(&transcript)
            .await
            .map_err(|source| EnrichmentError::Step {
                step: EnrichmentStep::Quiz,
                source,
            })?;
        VideoRepo::set_quiz(&self.pool, video_id, &quiz).await?;

        // Step 5: keywords and learning objectives depend only on the
        // transcript, not on each other. Fail-fast join: the first error
        // propagates without waiting for the slower call.
        let (keywords, objectives) = tokio::try_join!(
            async {
                self.provider
                    .extract_keywords(&transcript)
                    .await
                    .map_err(EnrichmentError::Extraction)
            },
            async {
                self.provider
                    .generate_learning_objectives(&transcript)
                    .await
                    .map_err(EnrichmentError::Extraction)
            },
        )?;
        VideoRepo::set_keywords_and_objectives(&self.pool, video_id, &keywords, &objectives)
            .await?;

        Ok(())
    }

    /// Overwrite all four status fields from current content emptiness.
    ///
    /// Applying this twice yields the same map, so a failed write can be
    /// retried safely by a fresh run.
    async fn reconcile(&self, video_id: DbId) -> Result<(), EnrichmentError> {
        let Some(video) = VideoRepo::find_by_id(&self.pool, video_id).await? else {
            // Record deleted mid-run; nothing left to reconcile.
            return Ok(());
        };
        let status = processing::reconcile(video.content_presence());
        VideoRepo::set_statuses(&self.pool, video_id, &status).await?;
        Ok(())
    }
}
