//! GitHub provider facade.
//!
//! The review pipeline only talks to the two traits below; [`github::GitHubClient`]
//! implements both against the REST API.

pub mod app_auth;
pub mod disabled;
pub mod github;
pub mod types;

pub use types::*;

use std::str::FromStr;

use async_trait::async_trait;

use crate::errors::{GitContextEngineConfigError, GitContextEngineResult};

/// Default REST API base.
pub const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";

/// Fetches the reviewable diff of a pull request.
///
/// Failures of any kind (transport, status, empty data, missing installation
/// id) come back as `None`; the caller treats that as terminal.
#[async_trait]
pub trait DiffSource: Send + Sync {
    async fn fetch_diff(&self, pr: &PullRequestRef) -> Option<DiffRecord>;
}

/// Posts a comment on the pull request's conversation thread.
#[async_trait]
pub trait CommentPoster: Send + Sync {
    async fn post_comment(&self, pr: &PullRequestRef, body: &str) -> GitContextEngineResult<()>;
}

/// How requests to GitHub are authenticated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GitHubAuthMode {
    /// Personal access token; the whole PR diff is fetched.
    #[default]
    Token,
    /// GitHub App installation token; the latest commit's files are fetched.
    App,
}

impl FromStr for GitHubAuthMode {
    type Err = GitContextEngineConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "token" | "pat" => Ok(GitHubAuthMode::Token),
            "app" => Ok(GitHubAuthMode::App),
            other => Err(GitContextEngineConfigError::InvalidValue {
                var: "GITHUB_AUTH_MODE",
                value: other.to_string(),
            }),
        }
    }
}

/// Runtime configuration for the GitHub client.
///
/// # Environment variables
/// - `GITHUB_API_BASE` (default `https://api.github.com`)
/// - `GITHUB_AUTH_MODE` = `token` (default) | `app`
/// - `GITHUB_ACCESS_TOKEN` (required in token mode)
/// - `GITHUB_APP_JWT` (required in app mode; minted outside this service)
/// - `GITHUB_LATEST_COMMIT_RULE` = `list_order` (default) | `committer_date`
#[derive(Clone)]
pub struct GitHubConfig {
    pub base_api: String,
    pub auth_mode: GitHubAuthMode,
    pub access_token: Option<String>,
    pub app_jwt: Option<String>,
    pub latest_commit_rule: LatestCommitRule,
}

impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("base_api", &self.base_api)
            .field("auth_mode", &self.auth_mode)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("app_jwt", &self.app_jwt.as_ref().map(|_| "<redacted>"))
            .field("latest_commit_rule", &self.latest_commit_rule)
            .finish()
    }
}

impl GitHubConfig {
    /// Like [`GitHubConfig::from_env`], but a deployment that names no GitHub
    /// credential and no `GITHUB_AUTH_MODE` yields `Ok(None)`.
    ///
    /// An explicit `GITHUB_AUTH_MODE` keeps the hard credential check.
    pub fn from_env_optional(
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, GitContextEngineConfigError> {
        let set = |name: &str| env(name).is_some_and(|v| !v.trim().is_empty());
        if !["GITHUB_AUTH_MODE", "GITHUB_ACCESS_TOKEN", "GITHUB_APP_JWT"]
            .iter()
            .any(|name| set(name))
        {
            return Ok(None);
        }
        Self::from_env(env).map(Some)
    }

    /// Reads the configuration through `env` (usually the process environment).
    ///
    /// # Errors
    /// - [`GitContextEngineConfigError::MissingCredential`] when the selected
    ///   auth mode has no credential
    /// - [`GitContextEngineConfigError::InvalidBaseUrl`] for a non-http(s) base
    /// - [`GitContextEngineConfigError::InvalidValue`] for unknown enum values
    pub fn from_env(
        env: &dyn Fn(&str) -> Option<String>,
    ) -> Result<Self, GitContextEngineConfigError> {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let base_api = var("GITHUB_API_BASE")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_GITHUB_API_BASE.to_string());
        if !(base_api.starts_with("http://") || base_api.starts_with("https://")) {
            return Err(GitContextEngineConfigError::InvalidBaseUrl(base_api));
        }

        let auth_mode = match var("GITHUB_AUTH_MODE") {
            Some(v) => v.parse()?,
            None => GitHubAuthMode::default(),
        };
        let latest_commit_rule = match var("GITHUB_LATEST_COMMIT_RULE") {
            Some(v) => v.parse()?,
            None => LatestCommitRule::default(),
        };

        let access_token = var("GITHUB_ACCESS_TOKEN");
        let app_jwt = var("GITHUB_APP_JWT");
        match auth_mode {
            GitHubAuthMode::Token if access_token.is_none() => {
                return Err(GitContextEngineConfigError::MissingCredential(
                    "GITHUB_ACCESS_TOKEN",
                ));
            }
            GitHubAuthMode::App if app_jwt.is_none() => {
                return Err(GitContextEngineConfigError::MissingCredential("GITHUB_APP_JWT"));
            }
            _ => {}
        }

        Ok(Self {
            base_api,
            auth_mode,
            access_token,
            app_jwt,
            latest_commit_rule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn token_mode_is_the_default() {
        let cfg = GitHubConfig::from_env(&env_of(&[("GITHUB_ACCESS_TOKEN", "ghp_1")])).unwrap();
        assert_eq!(cfg.auth_mode, GitHubAuthMode::Token);
        assert_eq!(cfg.base_api, DEFAULT_GITHUB_API_BASE);
        assert_eq!(cfg.latest_commit_rule, LatestCommitRule::ListOrder);
        assert!(!format!("{cfg:?}").contains("ghp_1"));
    }

    #[test]
    fn app_mode_requires_jwt() {
        let err = GitHubConfig::from_env(&env_of(&[("GITHUB_AUTH_MODE", "app")])).unwrap_err();
        assert!(matches!(
            err,
            GitContextEngineConfigError::MissingCredential("GITHUB_APP_JWT")
        ));

        let cfg = GitHubConfig::from_env(&env_of(&[
            ("GITHUB_AUTH_MODE", "app"),
            ("GITHUB_APP_JWT", "eyJ"),
            ("GITHUB_API_BASE", "https://ghe.example.com/api/v3/"),
            ("GITHUB_LATEST_COMMIT_RULE", "committer_date"),
        ]))
        .unwrap();
        assert_eq!(cfg.base_api, "https://ghe.example.com/api/v3");
        assert_eq!(cfg.latest_commit_rule, LatestCommitRule::CommitterDate);
    }

    #[test]
    fn token_mode_without_token_is_rejected() {
        assert!(matches!(
            GitHubConfig::from_env(&env_of(&[])),
            Err(GitContextEngineConfigError::MissingCredential("GITHUB_ACCESS_TOKEN"))
        ));
    }

    #[test]
    fn no_github_settings_means_no_config() {
        assert!(GitHubConfig::from_env_optional(&env_of(&[])).unwrap().is_none());
        assert!(
            GitHubConfig::from_env_optional(&env_of(&[("GITHUB_ACCESS_TOKEN", " ")]))
                .unwrap()
                .is_none()
        );

        let cfg = GitHubConfig::from_env_optional(&env_of(&[("GITHUB_ACCESS_TOKEN", "ghp_1")]))
            .unwrap()
            .unwrap();
        assert_eq!(cfg.auth_mode, GitHubAuthMode::Token);
    }

    #[test]
    fn explicit_auth_mode_still_requires_a_credential() {
        assert!(matches!(
            GitHubConfig::from_env_optional(&env_of(&[("GITHUB_AUTH_MODE", "token")])),
            Err(GitContextEngineConfigError::MissingCredential("GITHUB_ACCESS_TOKEN"))
        ));
    }
}
