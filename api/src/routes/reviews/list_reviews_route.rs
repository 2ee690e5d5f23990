use std::sync::Arc;

use axum::{Json, extract::State};
use pr_reviewer::ReviewRecord;
use tracing::{debug, error, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult, FETCH_REVIEWS_FAILED},
};

/// All stored reviews, newest first.
#[instrument(name = "list_reviews_route", skip_all)]
pub async fn list_reviews_route(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<Vec<ReviewRecord>>> {
    let reviews = state.store.list_newest_first().await.map_err(|e| {
        error!(error = %e, "listing reviews failed");
        AppError::internal(FETCH_REVIEWS_FAILED)
    })?;
    debug!(count = reviews.len(), "reviews listed");
    Ok(Json(reviews))
}
