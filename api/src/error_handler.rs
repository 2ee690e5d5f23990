use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use pr_reviewer::ManualReviewError;
use serde::Serialize;
use thiserror::Error;

use crate::core::app_state::ConfigError;

pub const NO_CODE_PROVIDED: &str = "No code provided!";
pub const AI_PROCESSING_FAILED: &str = "Error processing AI request";
pub const FETCH_REVIEWS_FAILED: &str = "Error fetching reviews";
pub const DELETE_REVIEW_FAILED: &str = "Error deleting review";

/// Public application error type.
///
/// Clients only ever see `{ "error": "<short message>" }`; details stay in logs.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    Config(#[from] ConfigError),

    // --- IO / network / server ---
    #[error("failed to bind listener on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request handling ---
    #[error("{message}")]
    Http {
        status: StatusCode,
        message: &'static str,
    },
}

impl AppError {
    pub fn bad_request(message: &'static str) -> Self {
        AppError::Http {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    pub fn internal(message: &'static str) -> Self {
        AppError::Http {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Http { status, .. } => *status,
            // startup-only
            AppError::Config(_) | AppError::Bind { .. } | AppError::Server(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> &'static str {
        match self {
            AppError::Http { message, .. } => *message,
            _ => "Internal server error",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.client_message(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Maps the manual review outcome: caller mistakes are 400, everything else
/// (AI failure, quality gate, store) is the same generic 500.
impl From<ManualReviewError> for AppError {
    fn from(err: ManualReviewError) -> Self {
        if err.is_client_error() {
            AppError::bad_request(NO_CODE_PROVIDED)
        } else {
            AppError::internal(AI_PROCESSING_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use pr_reviewer::ReviewError;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let resp = err.into_response();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn manual_review_errors_map_to_short_messages() {
        let (status, body) = render(ManualReviewError::MissingCode.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "No code provided!"}));

        for err in [
            ManualReviewError::EmptyReview,
            ManualReviewError::Ai(ReviewError::EmptyResponse),
        ] {
            let (status, body) = render(err.into()).await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, serde_json::json!({"error": "Error processing AI request"}));
        }
    }

    #[tokio::test]
    async fn startup_errors_do_not_leak_details() {
        let err = AppError::Server(std::io::Error::other("secret path /etc/x"));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }
}
