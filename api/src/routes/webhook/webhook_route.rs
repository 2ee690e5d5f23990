use std::sync::Arc;

use axum::{Json, extract::State, http::HeaderMap};
use pr_reviewer::ReviewOutcome;
use tracing::{debug, info, instrument};

use crate::{
    core::app_state::AppState,
    error_handler::{AppError, AppResult},
    routes::webhook::{webhook_body::WebhookBody, webhook_response::WebhookResponse},
};

/// Header GitHub uses to name the event type.
pub const GITHUB_EVENT_HEADER: &str = "x-github-event";

/// GitHub pull request webhook.
///
/// Only `pull_request` deliveries with `action == "opened"` are reviewed;
/// everything else, including bodies that are neither JSON nor a form
/// delivery, is acknowledged with "Event ignored". A missing event header is
/// tolerated so the endpoint can be driven by hand.
#[instrument(name = "webhook_route", skip_all)]
pub async fn webhook_route(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    WebhookBody(body): WebhookBody,
) -> AppResult<Json<WebhookResponse>> {
    if let Some(id) = headers.get("x-github-delivery").and_then(|h| h.to_str().ok()) {
        debug!(%id, "delivery id attached");
    }

    let event_kind = headers
        .get(GITHUB_EVENT_HEADER)
        .and_then(|h| h.to_str().ok());
    if let Some(kind) = event_kind.filter(|k| *k != "pull_request") {
        debug!(event = kind, "non pull_request event ignored");
        return Ok(Json(WebhookResponse::ignored()));
    }

    let Some(payload) = body else {
        return Ok(Json(WebhookResponse::ignored()));
    };

    let event = payload.into_event();
    match state.orchestrator.handle_event(event).await {
        ReviewOutcome::Ignored => Ok(Json(WebhookResponse::ignored())),
        ReviewOutcome::Completed { comment_posted } => {
            info!(comment_posted, "webhook review finished");
            Ok(Json(WebhookResponse::posted(comment_posted)))
        }
        ReviewOutcome::Failed(stage) => Err(AppError::internal(stage.message())),
    }
}
