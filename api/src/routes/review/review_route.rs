use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use pr_reviewer::{ManualReviewError, ReviewOutput};
use tracing::{error, instrument, warn};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::review::review_request::ReviewRequest,
};

/// Reviews a code snippet and stores the result.
///
/// A body that is not valid JSON (or has a non-string `code`) is treated like
/// a missing `code`.
#[instrument(name = "review_route", skip_all)]
pub async fn review_route(
    State(state): State<Arc<AppState>>,
    body: Result<Json<ReviewRequest>, JsonRejection>,
) -> AppResult<Json<ReviewOutput>> {
    let request = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable review request body");
            return Err(ManualReviewError::MissingCode.into());
        }
    };

    match state.manual.handle_review(request.code.as_deref()).await {
        Ok(output) => Ok(Json(output)),
        Err(err) => {
            if err.is_client_error() {
                warn!(error = %err, "review request rejected");
            } else {
                error!(error = %err, "manual review failed");
            }
            Err(AppError::from(err))
        }
    }
}
