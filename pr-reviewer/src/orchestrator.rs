//! Webhook flow: filter the event, fetch the diff, ask the AI, post a comment.
//!
//! ```text
//! ReceivedEvent -> FilterEvent -> FetchingDiff -> Reviewing -> PostingComment -> Done
//!                       |              |              |
//!                    Ignored     Failed(DiffFetch) Failed(AiReview)
//! ```
//!
//! Nothing is retried. Comment delivery is best effort: a failure is logged
//! with `event = "comment_delivery_failed"` and reported through the
//! `comment_posted` flag of [`ReviewOutcome::Completed`], never as a failed
//! review.

use std::fmt;
use std::sync::Arc;

use git_context_engine::{CommentPoster, DiffSource, PullRequestRef};
use tracing::{debug, info, instrument, warn};

use crate::review::{AiReviewer, build_webhook_prompt};

/// The only action that triggers a review.
pub const REVIEWED_ACTION: &str = "opened";

/// Inbound pull request event, already reduced to what the flow needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: String,
    /// `None` when the payload had no (usable) pull request.
    pub pull_request: Option<PullRequestRef>,
}

/// Stage at which a review failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedStage {
    DiffFetch,
    AiReview,
}

impl FailedStage {
    /// Client-facing message for this failure.
    pub fn message(self) -> &'static str {
        match self {
            FailedStage::DiffFetch => "Failed to fetch PR diff",
            FailedStage::AiReview => "Failed to generate AI review",
        }
    }
}

impl fmt::Display for FailedStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Terminal state of one webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    Ignored,
    Completed { comment_posted: bool },
    Failed(FailedStage),
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    FilterEvent,
    FetchingDiff,
    Reviewing,
    PostingComment,
    Done,
}

/// Sequences diff retrieval, the AI call and comment posting.
#[derive(Clone)]
pub struct PrReviewOrchestrator {
    diffs: Arc<dyn DiffSource>,
    reviewer: Arc<dyn AiReviewer>,
    comments: Arc<dyn CommentPoster>,
}

impl PrReviewOrchestrator {
    pub fn new(
        diffs: Arc<dyn DiffSource>,
        reviewer: Arc<dyn AiReviewer>,
        comments: Arc<dyn CommentPoster>,
    ) -> Self {
        Self {
            diffs,
            reviewer,
            comments,
        }
    }

    #[instrument(skip_all, fields(action = %event.action))]
    pub async fn handle_event(&self, event: PullRequestEvent) -> ReviewOutcome {
        enter(Stage::FilterEvent);
        let pr = match event.pull_request {
            Some(pr) if event.action == REVIEWED_ACTION => pr,
            _ => {
                debug!("event ignored");
                return ReviewOutcome::Ignored;
            }
        };
        info!(pr = %pr, "reviewing pull request");

        enter(Stage::FetchingDiff);
        let Some(diff) = self.diffs.fetch_diff(&pr).await else {
            warn!(pr = %pr, "no diff available, aborting review");
            return ReviewOutcome::Failed(FailedStage::DiffFetch);
        };

        enter(Stage::Reviewing);
        let prompt = build_webhook_prompt(&diff);
        let review = match self.reviewer.review(&prompt).await {
            Ok(text) => text,
            Err(e) => {
                warn!(pr = %pr, error = %e, "AI review failed");
                return ReviewOutcome::Failed(FailedStage::AiReview);
            }
        };

        enter(Stage::PostingComment);
        let comment_posted = match self.comments.post_comment(&pr, &review).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    event = "comment_delivery_failed",
                    pr = %pr,
                    error = %e,
                    "could not post review comment"
                );
                false
            }
        };

        enter(Stage::Done);
        ReviewOutcome::Completed { comment_posted }
    }
}

fn enter(stage: Stage) {
    debug!(stage = ?stage, "webhook review stage");
}
