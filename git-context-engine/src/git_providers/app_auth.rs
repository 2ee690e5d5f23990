//! GitHub App installation tokens.
//!
//! Minting the App JWT (RS256 over the App's private key) happens outside
//! this service; [`AppJwtTokenSource`] only exchanges that JWT for a
//! short-lived installation token:
//!   * POST /app/installations/{installation_id}/access_tokens

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::errors::{GitContextEngineProviderError, GitContextEngineResult};

/// Issues installation access tokens for a GitHub App.
#[async_trait]
pub trait InstallationTokenSource: Send + Sync {
    async fn installation_token(&self, installation_id: u64) -> GitContextEngineResult<String>;
}

/// Exchanges a pre-minted App JWT for installation tokens on every call.
#[derive(Clone)]
pub struct AppJwtTokenSource {
    http: Client,
    base_api: String,
    app_jwt: String,
}

impl AppJwtTokenSource {
    pub fn new(http: Client, base_api: String, app_jwt: String) -> Self {
        Self {
            http,
            base_api,
            app_jwt,
        }
    }
}

#[derive(Debug, Deserialize)]
struct InstallationTokenResponse {
    token: String,
}

#[async_trait]
impl InstallationTokenSource for AppJwtTokenSource {
    async fn installation_token(&self, installation_id: u64) -> GitContextEngineResult<String> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.base_api, installation_id
        );
        debug!("GitHub installation token: {}", url);

        let resp: InstallationTokenResponse = self
            .http
            .post(url)
            .bearer_auth(&self.app_jwt)
            .header("Accept", "application/vnd.github+json")
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if resp.token.trim().is_empty() {
            return Err(GitContextEngineProviderError::InvalidResponse(
                "empty installation token".into(),
            )
            .into());
        }

        Ok(resp.token)
    }
}
