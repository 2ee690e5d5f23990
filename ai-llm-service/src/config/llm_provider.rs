use std::str::FromStr;

use crate::error_handler::ConfigError;

/// Represents the provider (backend) used for chat completions.
///
/// Both variants speak the OpenAI `/v1/chat/completions` protocol; they
/// differ only in default endpoint and the extra headers sent.
///
/// # Examples
///
/// ```
/// use ai_llm_service::LlmProvider;
///
/// let provider: LlmProvider = "openrouter".parse().unwrap();
/// assert_eq!(provider, LlmProvider::OpenRouter);
/// assert_eq!(provider.default_endpoint(), "https://openrouter.ai/api");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// OpenRouter gateway (`https://openrouter.ai/api`).
    OpenRouter,
    /// OpenAI's API or any self-hosted OpenAI-compatible server.
    OpenAI,
}

impl LlmProvider {
    /// Base URL used when `LLM_ENDPOINT` is not set.
    pub fn default_endpoint(self) -> &'static str {
        match self {
            LlmProvider::OpenRouter => "https://openrouter.ai/api",
            LlmProvider::OpenAI => "https://api.openai.com",
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(LlmProvider::OpenRouter),
            "openai" | "chatgpt" => Ok(LlmProvider::OpenAI),
            other => Err(ConfigError::UnsupportedProvider(other.to_string())),
        }
    }
}
