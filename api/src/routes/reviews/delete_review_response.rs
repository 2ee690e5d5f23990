use serde::Serialize;

/// Confirmation returned by `DELETE /review/{id}`.
#[derive(Debug, Serialize)]
pub struct DeleteReviewResponse {
    pub message: &'static str,
}
