use std::convert::Infallible;

use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use serde::Deserialize;
use tracing::warn;

use crate::routes::webhook::webhook_payload::PullRequestWebhook;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// GitHub's `content_type=form` delivery: the JSON document sits in `payload`.
#[derive(Debug, Deserialize)]
struct FormDelivery {
    payload: String,
}

/// Webhook body in either delivery format GitHub offers.
///
/// `None` when the body is neither a JSON document nor a form with a JSON
/// `payload` field; such deliveries are acknowledged as ignored.
#[derive(Debug)]
pub struct WebhookBody(pub Option<PullRequestWebhook>);

impl<S> FromRequest<S> for WebhookBody
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with(FORM_CONTENT_TYPE));

        let parsed = if is_form {
            match Form::<FormDelivery>::from_request(req, state).await {
                Ok(Form(delivery)) => {
                    serde_json::from_str(&delivery.payload).map_err(|e| e.to_string())
                }
                Err(rejection) => Err(rejection.body_text()),
            }
        } else {
            Json::<PullRequestWebhook>::from_request(req, state)
                .await
                .map(|Json(payload)| payload)
                .map_err(|rejection| rejection.body_text())
        };

        match parsed {
            Ok(payload) => Ok(Self(Some(payload))),
            Err(error) => {
                warn!(%error, form = is_form, "unreadable webhook payload");
                Ok(Self(None))
            }
        }
    }
}
