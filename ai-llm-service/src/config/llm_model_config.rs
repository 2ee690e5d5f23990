use crate::config::llm_provider::LlmProvider;

/// Configuration for a chat-completion model invocation.
///
/// # Fields
///
/// - `provider`: OpenRouter or a plain OpenAI-compatible server.
/// - `model`: The model identifier (e.g., `"open-r1/olympiccoder-7b:free"`).
/// - `endpoint`: Base URL; `/v1/chat/completions` is appended.
/// - `api_key`: Bearer token for the provider.
/// - `max_tokens`: Maximum number of tokens to generate.
/// - `temperature`: Controls randomness (0.0 = deterministic).
/// - `top_p`: Nucleus sampling cutoff (alternative to temperature).
/// - `timeout_secs`: Optional request timeout in seconds.
///
/// # Examples
///
/// ```
/// use ai_llm_service::{LlmModelConfig, LlmProvider};
///
/// let cfg = LlmModelConfig {
///     provider: LlmProvider::OpenRouter,
///     model: "open-r1/olympiccoder-7b:free".to_string(),
///     endpoint: "https://openrouter.ai/api".to_string(),
///     api_key: Some("sk-or-...".to_string()),
///     max_tokens: Some(800),
///     temperature: Some(0.3),
///     top_p: None,
///     timeout_secs: Some(120),
/// };
/// assert_eq!(cfg.max_tokens, Some(800));
/// ```
#[derive(Clone, PartialEq)]
pub struct LlmModelConfig {
    /// The provider/backend.
    pub provider: LlmProvider,

    /// Model identifier string.
    pub model: String,

    /// Inference endpoint base URL.
    pub endpoint: String,

    /// API key for authentication.
    pub api_key: Option<String>,

    /// Maximum number of tokens to generate.
    pub max_tokens: Option<u32>,

    /// Sampling temperature (controls creativity).
    pub temperature: Option<f32>,

    /// Nucleus sampling parameter.
    pub top_p: Option<f32>,

    /// Optional request timeout (in seconds).
    pub timeout_secs: Option<u64>,
}

impl std::fmt::Debug for LlmModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmModelConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
