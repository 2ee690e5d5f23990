use serde::Deserialize;

/// Request body for a manual review.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    /// Source code to review. Missing and blank are both rejected.
    #[serde(default)]
    pub code: Option<String>,
}
