//! Default chat-model config loaded from environment variables.
//!
//! # Environment variables
//!
//! - `LLM_KIND`          = `openrouter` (default) or `openai`
//! - `OPENROUTER_API_KEY` or `LLM_API_KEY` = API key (mandatory)
//! - `LLM_ENDPOINT`      = base URL (default depends on `LLM_KIND`)
//! - `LLM_MODEL`         = model id (default `open-r1/olympiccoder-7b:free`)
//! - `LLM_MAX_TOKENS`    = optional max tokens (u32, default 800)
//! - `LLM_TEMPERATURE`   = optional temperature (0.0..=2.0, default 0.3)
//! - `LLM_TIMEOUT_SECS`  = optional request timeout (default 120)

use crate::{
    config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider},
    error_handler::{
        AiLlmError, ConfigError, EnvLookup, env_opt_f32, env_opt_u32, env_opt_u64,
        validate_http_endpoint, validate_range_f32,
    },
};

pub const DEFAULT_MODEL: &str = "open-r1/olympiccoder-7b:free";
pub const DEFAULT_MAX_TOKENS: u32 = 800;
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Resolves the API key. `OPENROUTER_API_KEY` wins over `LLM_API_KEY`.
fn api_key(env: EnvLookup<'_>) -> Result<String, AiLlmError> {
    ["OPENROUTER_API_KEY", "LLM_API_KEY"]
        .into_iter()
        .filter_map(|name| env(name))
        .find(|v| !v.trim().is_empty())
        .ok_or(AiLlmError::Config(ConfigError::MissingVar(
            "OPENROUTER_API_KEY or LLM_API_KEY",
        )))
}

/// Constructs the chat config used for code reviews.
///
/// # Defaults
/// - `temperature = 0.3`
/// - `max_tokens = 800`
/// - `timeout_secs = 120`
///
/// # Errors
/// - [`ConfigError::MissingVar`] if no API key is set
/// - [`ConfigError::UnsupportedProvider`] for an unknown `LLM_KIND`
/// - [`ConfigError::InvalidFormat`] if `LLM_ENDPOINT` is not http(s)
/// - [`ConfigError::OutOfRange`] if the temperature is outside `0.0..=2.0`
pub fn config_chat_from_env(env: EnvLookup<'_>) -> Result<LlmModelConfig, AiLlmError> {
    let provider = match env("LLM_KIND").filter(|v| !v.trim().is_empty()) {
        Some(kind) => kind.parse::<LlmProvider>()?,
        None => LlmProvider::OpenRouter,
    };

    let endpoint = env("LLM_ENDPOINT")
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| provider.default_endpoint().to_string());
    validate_http_endpoint("LLM_ENDPOINT", &endpoint)?;

    let model = env("LLM_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());
    if model.trim().is_empty() {
        return Err(ConfigError::EmptyModel.into());
    }

    let temperature = env_opt_f32(env, "LLM_TEMPERATURE")?.unwrap_or(DEFAULT_TEMPERATURE);
    validate_range_f32("temperature", temperature, 0.0, 2.0)?;

    Ok(LlmModelConfig {
        provider,
        model,
        endpoint,
        api_key: Some(api_key(env)?),
        max_tokens: Some(env_opt_u32(env, "LLM_MAX_TOKENS")?.unwrap_or(DEFAULT_MAX_TOKENS)),
        temperature: Some(temperature),
        top_p: None,
        timeout_secs: Some(env_opt_u64(env, "LLM_TIMEOUT_SECS")?.unwrap_or(DEFAULT_TIMEOUT_SECS)),
    })
}
