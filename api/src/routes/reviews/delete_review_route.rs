use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{error, info, instrument};
use uuid::Uuid;

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult, DELETE_REVIEW_FAILED},
    routes::reviews::delete_review_response::DeleteReviewResponse,
};

/// Deletes a review by id.
///
/// Succeeds whether or not the id existed; an id that is not a UUID cannot
/// name a stored review and is treated as unknown.
#[instrument(name = "delete_review_route", skip(state))]
pub async fn delete_review_route(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> AppResult<Json<DeleteReviewResponse>> {
    let removed = match Uuid::parse_str(id.trim()) {
        Ok(uuid) => state.store.delete(uuid).await.map_err(|e| {
            error!(error = %e, "deleting review failed");
            AppError::internal(DELETE_REVIEW_FAILED)
        })?,
        Err(_) => false,
    };
    info!(removed, "delete review handled");

    Ok(Json(DeleteReviewResponse {
        message: "Review deleted successfully",
    }))
}
