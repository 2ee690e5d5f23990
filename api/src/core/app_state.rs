use std::path::PathBuf;
use std::sync::Arc;

use ai_llm_service::{
    AiLlmError, LlmModelConfig, OpenAiService, config::default_config::config_chat_from_env,
};
use git_context_engine::{
    CommentPoster, DiffSource, DisabledGitHub, GitContextEngineError, GitHubClient, GitHubConfig,
    errors::GitContextEngineConfigError,
};
use pr_reviewer::{
    AiReviewer, LlmReviewClient, ManualReviewService, PrReviewOrchestrator, ReviewStore,
    store::store_for_path,
};
use thiserror::Error;
use tracing::{info, warn};

/// Port used when neither `API_ADDRESS` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 5002;

/// Startup configuration problems.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid PORT value: {0}")]
    InvalidPort(String),

    #[error("LLM configuration: {0}")]
    Llm(#[from] AiLlmError),

    #[error("GitHub configuration: {0}")]
    GitHub(#[from] GitContextEngineConfigError),

    #[error("GitHub client: {0}")]
    GitHubClient(#[from] GitContextEngineError),
}

/// Everything the server needs to start, read from the environment.
#[derive(Clone)]
pub struct AppConfig {
    /// `API_ADDRESS`, or `0.0.0.0:{PORT}`.
    pub listen_addr: String,
    pub llm: LlmModelConfig,
    /// `None` when no GitHub setting is present; the webhook flow then fails
    /// at the diff stage while the manual flow keeps working.
    pub github: Option<GitHubConfig>,
    /// `REVIEW_STORE_PATH`; in-memory store when unset.
    pub review_store_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env(env: &dyn Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        let listen_addr = match var("API_ADDRESS") {
            Some(addr) => addr.trim().to_string(),
            None => {
                let port = match var("PORT") {
                    Some(p) => p
                        .trim()
                        .parse::<u16>()
                        .map_err(|_| ConfigError::InvalidPort(p))?,
                    None => DEFAULT_PORT,
                };
                format!("0.0.0.0:{port}")
            }
        };

        Ok(Self {
            listen_addr,
            llm: config_chat_from_env(env)?,
            github: GitHubConfig::from_env_optional(env)?,
            review_store_path: var("REVIEW_STORE_PATH").map(PathBuf::from),
        })
    }
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub manual: ManualReviewService,
    pub orchestrator: PrReviewOrchestrator,
    pub store: Arc<dyn ReviewStore>,
}

impl AppState {
    /// Wires the flows from already-built collaborators.
    pub fn new(
        reviewer: Arc<dyn AiReviewer>,
        diffs: Arc<dyn DiffSource>,
        comments: Arc<dyn CommentPoster>,
        store: Arc<dyn ReviewStore>,
    ) -> Self {
        Self {
            manual: ManualReviewService::new(reviewer.clone(), store.clone()),
            orchestrator: PrReviewOrchestrator::new(diffs, reviewer, comments),
            store,
        }
    }

    /// Builds the real collaborators (LLM client, GitHub client, review store).
    pub fn from_config(cfg: &AppConfig) -> Result<Self, ConfigError> {
        let reviewer = Arc::new(LlmReviewClient::new(OpenAiService::new(cfg.llm.clone())?));
        let (diffs, comments): (Arc<dyn DiffSource>, Arc<dyn CommentPoster>) = match &cfg.github {
            Some(github) => {
                let client = Arc::new(GitHubClient::from_config(github.clone())?);
                (client.clone(), client)
            }
            None => {
                warn!("GitHub is not configured; webhook reviews will fail at the diff stage");
                (Arc::new(DisabledGitHub), Arc::new(DisabledGitHub))
            }
        };
        let store = store_for_path(cfg.review_store_path.clone());

        let store_kind = match &cfg.review_store_path {
            Some(p) => p.display().to_string(),
            None => "memory".to_string(),
        };
        info!(
            model = %cfg.llm.model,
            github_mode = ?cfg.github.as_ref().map(|g| g.auth_mode),
            store = %store_kind,
            "application state ready"
        );

        Ok(Self::new(reviewer, diffs, comments, store))
    }
}

#[cfg(test)]
mod tests {
    use git_context_engine::PullRequestRef;
    use pr_reviewer::{FailedStage, PullRequestEvent, ReviewOutcome};

    use super::*;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    const BASE: &[(&str, &str)] = &[
        ("OPENROUTER_API_KEY", "sk-or-1"),
        ("GITHUB_ACCESS_TOKEN", "ghp_1"),
    ];

    #[test]
    fn defaults_to_port_5002_and_memory_store() {
        let cfg = AppConfig::from_env(&env_of(BASE)).unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:5002");
        assert!(cfg.review_store_path.is_none());
        assert_eq!(cfg.llm.model, "open-r1/olympiccoder-7b:free");
    }

    #[test]
    fn port_and_address_overrides() {
        let cfg = AppConfig::from_env(&env_of(&[
            ("OPENROUTER_API_KEY", "k"),
            ("GITHUB_ACCESS_TOKEN", "t"),
            ("PORT", "8080"),
            ("REVIEW_STORE_PATH", "/tmp/reviews.json"),
        ]))
        .unwrap();
        assert_eq!(cfg.listen_addr, "0.0.0.0:8080");
        assert_eq!(cfg.review_store_path, Some(PathBuf::from("/tmp/reviews.json")));

        let cfg = AppConfig::from_env(&env_of(&[
            ("OPENROUTER_API_KEY", "k"),
            ("GITHUB_ACCESS_TOKEN", "t"),
            ("API_ADDRESS", "127.0.0.1:9000"),
            ("PORT", "8080"),
        ]))
        .unwrap();
        assert_eq!(cfg.listen_addr, "127.0.0.1:9000");
    }

    #[test]
    fn bad_port_and_missing_credentials_are_rejected() {
        assert!(matches!(
            AppConfig::from_env(&env_of(&[
                ("OPENROUTER_API_KEY", "k"),
                ("GITHUB_ACCESS_TOKEN", "t"),
                ("PORT", "http"),
            ])),
            Err(ConfigError::InvalidPort(_))
        ));
        assert!(matches!(
            AppConfig::from_env(&env_of(&[("GITHUB_ACCESS_TOKEN", "t")])),
            Err(ConfigError::Llm(_))
        ));
        assert!(matches!(
            AppConfig::from_env(&env_of(&[
                ("OPENROUTER_API_KEY", "k"),
                ("GITHUB_AUTH_MODE", "app"),
            ])),
            Err(ConfigError::GitHub(_))
        ));
    }

    #[tokio::test]
    async fn llm_key_alone_is_enough_to_start() {
        let cfg = AppConfig::from_env(&env_of(&[("OPENROUTER_API_KEY", "sk-or-1")])).unwrap();
        assert!(cfg.github.is_none());

        let state = AppState::from_config(&cfg).unwrap();
        assert!(state.store.list_newest_first().await.unwrap().is_empty());

        let outcome = state
            .orchestrator
            .handle_event(PullRequestEvent {
                action: "opened".into(),
                pull_request: Some(PullRequestRef {
                    owner: "octo".into(),
                    repo_name: "demo".into(),
                    pr_number: 1,
                    installation_id: None,
                }),
            })
            .await;
        assert_eq!(outcome, ReviewOutcome::Failed(FailedStage::DiffFetch));
    }
}
