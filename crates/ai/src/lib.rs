//! AI content provider client for video enrichment.
//!
//! Exposes [`ContentProvider`], the capability-per-method view of the
//! completion service the enrichment pipeline consumes, and
//! [`OpenAiProvider`], the chat-completions implementation.

pub mod config;
pub mod openai;
pub mod provider;

pub use config::ProviderConfig;
pub use openai::OpenAiProvider;
pub use provider::{ContentProvider, ProviderError};
