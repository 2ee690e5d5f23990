//! `/review` flow: review a raw snippet, split the answer, persist it.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::errors::ManualReviewError;
use crate::review::{AiReviewer, build_manual_prompt, split_ai_response};
use crate::store::{ReviewRecord, ReviewStore};

/// Response body of a successful manual review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewOutput {
    pub review: String,
    pub optimized_code: String,
}

#[derive(Clone)]
pub struct ManualReviewService {
    reviewer: Arc<dyn AiReviewer>,
    store: Arc<dyn ReviewStore>,
}

impl ManualReviewService {
    pub fn new(reviewer: Arc<dyn AiReviewer>, store: Arc<dyn ReviewStore>) -> Self {
        Self { reviewer, store }
    }

    /// Reviews `code` and stores the result.
    ///
    /// # Errors
    /// - [`ManualReviewError::MissingCode`] for absent or blank code (no AI call)
    /// - [`ManualReviewError::Ai`] when the AI call fails
    /// - [`ManualReviewError::EmptyReview`] when the answer has no review text
    ///   before the optimized-code marker (nothing is stored)
    /// - [`ManualReviewError::Store`] when persisting fails
    #[instrument(skip_all, fields(code_len = code.map(str::len)))]
    pub async fn handle_review(
        &self,
        code: Option<&str>,
    ) -> Result<ReviewOutput, ManualReviewError> {
        let code = match code {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(ManualReviewError::MissingCode),
        };

        let raw = self.reviewer.review(&build_manual_prompt(code)).await?;
        let result = split_ai_response(&raw);
        if result.has_empty_review() {
            warn!("AI answer had no review before the optimized-code marker");
            return Err(ManualReviewError::EmptyReview);
        }

        let output = ReviewOutput {
            review: result.review_text.clone(),
            optimized_code: result.optimized_code.clone(),
        };
        let record = ReviewRecord::new(code, result);
        let id = record.id;
        self.store.insert(record).await?;

        info!(review_id = %id, "manual review stored");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::errors::{ReviewError, StoreError};
    use crate::review::ReviewPrompt;
    use crate::store::InMemoryReviewStore;

    struct CannedReviewer {
        answer: Result<&'static str, ()>,
        calls: AtomicUsize,
    }

    impl CannedReviewer {
        fn ok(answer: &'static str) -> Arc<Self> {
            Arc::new(Self {
                answer: Ok(answer),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl AiReviewer for CannedReviewer {
        async fn review(&self, prompt: &ReviewPrompt) -> Result<String, ReviewError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            assert!(prompt.system.is_some());
            self.answer
                .map(str::to_string)
                .map_err(|_| ReviewError::EmptyResponse)
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl ReviewStore for BrokenStore {
        async fn insert(&self, _record: ReviewRecord) -> Result<(), StoreError> {
            Err(StoreError::Io(std::io::Error::other("disk full")))
        }
        async fn list_newest_first(&self) -> Result<Vec<ReviewRecord>, StoreError> {
            Ok(Vec::new())
        }
        async fn delete(&self, _id: uuid::Uuid) -> Result<bool, StoreError> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn successful_review_is_split_and_stored() {
        let reviewer = CannedReviewer::ok("Summary...\n### Optimized Code:\n```print(2)```");
        let store = Arc::new(InMemoryReviewStore::default());
        let svc = ManualReviewService::new(reviewer.clone(), store.clone());

        let out = svc.handle_review(Some("print(1)")).await.unwrap();
        assert_eq!(
            out,
            ReviewOutput {
                review: "Summary...".into(),
                optimized_code: "print(2)".into(),
            }
        );

        let stored = store.list_newest_first().await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].code, "print(1)");
        assert_eq!(stored[0].optimized_code, "print(2)");
    }

    #[tokio::test]
    async fn blank_code_is_rejected_without_ai_call() {
        let reviewer = CannedReviewer::ok("unused");
        let svc = ManualReviewService::new(reviewer.clone(), Arc::new(InMemoryReviewStore::default()));

        for code in [None, Some(""), Some("  \n\t")] {
            let err = svc.handle_review(code).await.unwrap_err();
            assert!(matches!(err, ManualReviewError::MissingCode));
            assert!(err.is_client_error());
        }
        assert_eq!(reviewer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn marker_only_answer_fails_quality_gate_and_stores_nothing() {
        let store = Arc::new(InMemoryReviewStore::default());
        let svc = ManualReviewService::new(
            CannedReviewer::ok("   \n### Optimized Code:\n```x```"),
            store.clone(),
        );

        let err = svc.handle_review(Some("x")).await.unwrap_err();
        assert!(matches!(err, ManualReviewError::EmptyReview));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn ai_and_store_failures_are_distinct() {
        let failing = Arc::new(CannedReviewer {
            answer: Err(()),
            calls: AtomicUsize::new(0),
        });
        let svc = ManualReviewService::new(failing, Arc::new(InMemoryReviewStore::default()));
        assert!(matches!(
            svc.handle_review(Some("x")).await,
            Err(ManualReviewError::Ai(_))
        ));

        let svc = ManualReviewService::new(CannedReviewer::ok("fine"), Arc::new(BrokenStore));
        assert!(matches!(
            svc.handle_review(Some("x")).await,
            Err(ManualReviewError::Store(_))
        ));
    }
}
