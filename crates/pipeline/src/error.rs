use edutube_ai::ProviderError;
use edutube_core::processing::EnrichmentStep;
use edutube_core::types::DbId;

/// Errors surfaced by an enrichment run.
#[derive(Debug, thiserror::Error)]
pub enum EnrichmentError {
    /// The video id resolves to no record.
    #[error("Video {0} not found")]
    NotFound(DbId),

    /// Another run currently holds the record; the claim write matched no
    /// row. Callers should retry once the running enrichment settles.
    #[error("Enrichment already running for video {0}")]
    AlreadyRunning(DbId),

    /// A provider call failed. The step names the first capability that
    /// failed; everything after it was not attempted.
    #[error("AI {step} generation failed: {source}")]
    Step {
        step: EnrichmentStep,
        source: ProviderError,
    },

    /// The keyword/objective extraction pair failed. These carry no status
    /// field; content-field statuses were already completed when this fired.
    #[error("AI keyword/objective extraction failed: {0}")]
    Extraction(ProviderError),

    /// A record-store write or read failed.
    #[error("Record store error: {0}")]
    Store(#[from] sqlx::Error),
}
