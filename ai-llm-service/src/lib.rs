//! OpenAI-compatible chat completion client shared by the review backend.
//!
//! - [`config`]: model/provider configuration and env-driven defaults
//! - [`services::open_ai_service::OpenAiService`]: non-streaming chat completions
//! - [`error_handler`]: unified [`error_handler::AiLlmError`]
//! - [`telemetry`]: library-scoped tracing layer

pub mod config;
pub mod error_handler;
pub mod services;
pub mod telemetry;

pub use config::{llm_model_config::LlmModelConfig, llm_provider::LlmProvider};
pub use error_handler::{AiLlmError, Result};
pub use services::open_ai_service::OpenAiService;
