//! Review flows of the backend.
//!
//! 1) **Manual review** ([`manual::ManualReviewService`])
//!    - Build the manual prompt (system persona + optimized-code heading)
//!    - Call the AI, split the answer into review and optimized code
//!    - Reject answers without a review, persist the rest via [`store::ReviewStore`]
//!
//! 2) **Webhook review** ([`orchestrator::PrReviewOrchestrator`])
//!    - Only `opened` pull requests are reviewed
//!    - Fetch the diff, ask for a review-only answer, post it as a PR comment
//!
//! All collaborators are passed in as `Arc<dyn Trait>`; nothing is global.

pub mod errors;
pub mod manual;
pub mod orchestrator;
pub mod review;
pub mod store;

pub use errors::{ManualReviewError, ReviewError, StoreError};
pub use manual::{ManualReviewService, ReviewOutput};
pub use orchestrator::{FailedStage, PrReviewOrchestrator, PullRequestEvent, ReviewOutcome};
pub use review::{AiReviewResult, AiReviewer, LlmReviewClient, ReviewPrompt, split_ai_response};
pub use store::{InMemoryReviewStore, JsonFileReviewStore, ReviewRecord, ReviewStore};
