//! Provider configuration loaded from environment variables.

/// Connection settings for the completion API.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Bearer token for the completion API.
    pub api_key: String,
    /// Base API URL (default: `https://api.openai.com/v1`).
    pub api_url: String,
    /// Model identifier sent with every request (default: `gpt-3.5-turbo`).
    pub model: String,
}

impl ProviderConfig {
    /// Load provider configuration from environment variables.
    ///
    /// | Env Var          | Required | Default                     |
    /// |------------------|----------|-----------------------------|
    /// | `OPENAI_API_KEY` | **yes**  | --                          |
    /// | `OPENAI_API_URL` | no       | `https://api.openai.com/v1` |
    /// | `OPENAI_MODEL`   | no       | `gpt-3.5-turbo`             |
    ///
    /// # Panics
    ///
    /// Panics if `OPENAI_API_KEY` is not set.
    pub fn from_env() -> Self {
        let api_key =
            std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY must be set in the environment");

        let api_url = std::env::var("OPENAI_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());

        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".into());

        Self {
            api_key,
            api_url,
            model,
        }
    }
}
