//! Prompting, the AI call and parsing of the model answer.

pub mod llm;
pub mod prompt;
pub mod splitter;

pub use llm::{AiReviewer, LlmReviewClient};
pub use prompt::{ReviewPrompt, build_manual_prompt, build_webhook_prompt};
pub use splitter::{AiReviewResult, split_ai_response};
