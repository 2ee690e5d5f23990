//! AI review client: sends a [`ReviewPrompt`] to the chat-completion API.

use ai_llm_service::OpenAiService;
use async_trait::async_trait;
use tracing::{debug, error};

use crate::errors::ReviewError;
use crate::review::prompt::ReviewPrompt;

/// Produces the raw model answer for a prompt.
#[async_trait]
pub trait AiReviewer: Send + Sync {
    async fn review(&self, prompt: &ReviewPrompt) -> Result<String, ReviewError>;
}

/// [`AiReviewer`] backed by an OpenAI-compatible endpoint.
pub struct LlmReviewClient {
    svc: OpenAiService,
}

impl LlmReviewClient {
    pub fn new(svc: OpenAiService) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl AiReviewer for LlmReviewClient {
    async fn review(&self, prompt: &ReviewPrompt) -> Result<String, ReviewError> {
        debug!(
            model = self.svc.model(),
            system = prompt.system.is_some(),
            prompt_len = prompt.user.len(),
            "sending review prompt"
        );

        let text = self
            .svc
            .generate(&prompt.user, prompt.system.as_deref())
            .await
            .map_err(|e| {
                error!(error = %e, "AI review request failed");
                ReviewError::from(e)
            })?;

        if text.trim().is_empty() {
            return Err(ReviewError::EmptyResponse);
        }
        Ok(text)
    }
}
