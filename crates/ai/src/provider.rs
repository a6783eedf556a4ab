//! The content-provider abstraction consumed by the enrichment pipeline.

use async_trait::async_trait;
use edutube_core::content::{Chapter, QuizQuestion};

/// Errors from the AI provider layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code (includes quota
    /// exhaustion).
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The provider responded 2xx but the payload could not be interpreted.
    #[error("Malformed provider response: {0}")]
    Malformed(String),
}

/// One async method per enrichment capability.
///
/// All methods are single-attempt with no built-in retry; retry policy, if
/// any, belongs to the caller. Implementations must be shareable across
/// tasks.
#[async_trait]
pub trait ContentProvider: Send + Sync {
    /// Produce a transcript for the media at the given reference.
    async fn generate_transcript(&self, media_url: &str) -> Result<String, ProviderError>;

    /// Summarize a transcript.
    async fn generate_summary(&self, transcript: &str) -> Result<String, ProviderError>;

    /// Split a transcript into ordered chapters.
    async fn detect_chapters(&self, transcript: &str) -> Result<Vec<Chapter>, ProviderError>;

    /// Generate a multiple-choice quiz from a transcript.
    async fn generate_quiz(&self, transcript: &str) -> Result<Vec<QuizQuestion>, ProviderError>;

    /// Extract key terms and concepts.
    async fn extract_keywords(&self, transcript: &str) -> Result<Vec<String>, ProviderError>;

    /// Derive learning objectives.
    async fn generate_learning_objectives(
        &self,
        transcript: &str,
    ) -> Result<Vec<String>, ProviderError>;
}
