//! Chat-completions implementation of [`ContentProvider`].
//!
//! Every capability is a single completion request with its own system
//! prompt and token budget. Capabilities that return structured data ask
//! the model for a JSON payload and tolerate a surrounding markdown code
//! fence, which some models emit despite instructions.

use async_trait::async_trait;
use edutube_core::content::{Chapter, QuizQuestion};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;

use crate::config::ProviderConfig;
use crate::provider::{ContentProvider, ProviderError};

/// Per-capability completion budgets, in tokens.
const SUMMARY_MAX_TOKENS: u32 = 500;
const CHAPTERS_MAX_TOKENS: u32 = 500;
const QUIZ_MAX_TOKENS: u32 = 1000;
const KEYWORDS_MAX_TOKENS: u32 = 300;
const OBJECTIVES_MAX_TOKENS: u32 = 500;

/// Stand-in transcript returned until audio transcription is wired up.
const PLACEHOLDER_TRANSCRIPT: &str = "Sample transcript content";

/// [`ContentProvider`] backed by an OpenAI-style chat-completions API.
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: ProviderConfig,
}

// Minimal view of a chat-completions response.
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

impl OpenAiProvider {
    pub fn new(config: ProviderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Issue one completion request and return the first choice's content.
    async fn complete(
        &self,
        system: &str,
        user: String,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.api_url))
            .bearer_auth(&self.config.api_key)
            .json(&json!({
                "model": self.config.model,
                "messages": [
                    { "role": "system", "content": system },
                    { "role": "user", "content": user },
                ],
                "max_tokens": max_tokens,
            }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletion = response
            .json()
            .await
            .map_err(|e| ProviderError::Malformed(format!("invalid completion payload: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or_else(|| ProviderError::Malformed("completion contained no content".into()))
    }
}

#[async_trait]
impl ContentProvider for OpenAiProvider {
    async fn generate_transcript(&self, media_url: &str) -> Result<String, ProviderError> {
        // TODO: call the audio transcription endpoint once media download
        // from object storage is wired up.
        tracing::info!(media_url, "generating transcript");
        Ok(PLACEHOLDER_TRANSCRIPT.to_string())
    }

    async fn generate_summary(&self, transcript: &str) -> Result<String, ProviderError> {
        self.complete(
            "You are an expert at summarizing educational content. \
             Create a concise but comprehensive summary.",
            format!("Please summarize the following transcript:\n\n{transcript}"),
            SUMMARY_MAX_TOKENS,
        )
        .await
    }

    async fn detect_chapters(&self, transcript: &str) -> Result<Vec<Chapter>, ProviderError> {
        let content = self
            .complete(
                "You are an expert at organizing educational content into logical \
                 chapters. Return a JSON array of objects with title, start_time, \
                 end_time (both in seconds), and summary.",
                format!(
                    "Please identify main chapters/sections from this transcript \
                     with timestamps:\n\n{transcript}"
                ),
                CHAPTERS_MAX_TOKENS,
            )
            .await?;
        parse_json_payload(&content)
    }

    async fn generate_quiz(&self, transcript: &str) -> Result<Vec<QuizQuestion>, ProviderError> {
        let content = self
            .complete(
                "You are an expert at creating educational assessments. Create \
                 multiple choice questions that test understanding of key concepts. \
                 Return a JSON array of objects with question, options (array of \
                 strings), correct_answer (index into options), and explanation.",
                format!("Please generate a quiz based on this transcript:\n\n{transcript}"),
                QUIZ_MAX_TOKENS,
            )
            .await?;
        parse_json_payload(&content)
    }

    async fn extract_keywords(&self, transcript: &str) -> Result<Vec<String>, ProviderError> {
        let content = self
            .complete(
                "Extract key technical terms and concepts as a JSON array of strings.",
                format!("Please extract important keywords from this transcript:\n\n{transcript}"),
                KEYWORDS_MAX_TOKENS,
            )
            .await?;
        parse_json_payload(&content)
    }

    async fn generate_learning_objectives(
        &self,
        transcript: &str,
    ) -> Result<Vec<String>, ProviderError> {
        let content = self
            .complete(
                "You are an expert at creating learning objectives. \
                 Return the response as a JSON array of strings.",
                format!(
                    "Please generate learning objectives based on this transcript:\n\n{transcript}"
                ),
                OBJECTIVES_MAX_TOKENS,
            )
            .await?;
        parse_json_payload(&content)
    }
}

/// Strip a surrounding markdown code fence, if present.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

/// Deserialize a structured completion, tolerating a code fence.
fn parse_json_payload<T: DeserializeOwned>(raw: &str) -> Result<T, ProviderError> {
    serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| ProviderError::Malformed(format!("expected JSON payload: {e}")))
}
