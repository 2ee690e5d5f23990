//! Crate-wide error hierarchy for pr-reviewer.
//!
//! - [`ReviewError`]: the AI review call failed.
//! - [`StoreError`]: the review store could not read or write records.
//! - [`ManualReviewError`]: outcome of the `/review` flow, mapped to HTTP by the api crate.

use ai_llm_service::AiLlmError;
use thiserror::Error;

/// AI review client failure.
#[derive(Debug, Error)]
pub enum ReviewError {
    /// The chat-completion call failed (transport, status, decode, empty choices).
    #[error(transparent)]
    Llm(#[from] AiLlmError),

    /// The model answered with nothing but whitespace.
    #[error("AI returned an empty response")]
    EmptyResponse,
}

/// Review store failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Why a manual review request did not produce a stored review.
#[derive(Debug, Error)]
pub enum ManualReviewError {
    /// Request carried no code (missing, empty or whitespace only).
    #[error("no code provided")]
    MissingCode,

    #[error("AI review failed: {0}")]
    Ai(#[from] ReviewError),

    /// The model answer had no review text before the optimized-code marker.
    #[error("AI response contained no review")]
    EmptyReview,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ManualReviewError {
    /// True for caller mistakes, false for upstream or quality-gate failures.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ManualReviewError::MissingCode)
    }
}
