use serde::Serialize;

/// Body of a 200 webhook answer.
#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub message: &'static str,
    /// Only present once a review was generated.
    #[serde(rename = "commentPosted", skip_serializing_if = "Option::is_none")]
    pub comment_posted: Option<bool>,
}

impl WebhookResponse {
    pub fn ignored() -> Self {
        Self {
            message: "Event ignored",
            comment_posted: None,
        }
    }

    pub fn posted(comment_posted: bool) -> Self {
        Self {
            message: "AI review posted",
            comment_posted: Some(comment_posted),
        }
    }
}
