//! GitHub provider (REST v3) for PR diffs, commit patches and comments.
//!
//! Endpoints used:
//!   * GET  /repos/{owner}/{repo}/pulls/{number}            (diff media type / JSON)
//!   * GET  /repos/{owner}/{repo}/pulls/{number}/commits
//!   * GET  /repos/{owner}/{repo}/commits/{sha}
//!   * POST /repos/{owner}/{repo}/issues/{number}/comments

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, header};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::errors::{GitContextEngineError, GitContextEngineProviderError, GitContextEngineResult};
use crate::git_providers::app_auth::{AppJwtTokenSource, InstallationTokenSource};
use crate::git_providers::types::*;
use crate::git_providers::{CommentPoster, DiffSource, GitHubAuthMode, GitHubConfig};

const USER_AGENT: &str = "ai-code-reviewer/0.1";
const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_DIFF: &str = "application/vnd.github.v3.diff";
const API_VERSION: &str = "2022-11-28";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// GitHub caps the PR commit listing at 250 commits, i.e. 3 pages of 100.
const MAX_COMMIT_PAGES: usize = 3;

/// How requests are authorized.
#[derive(Clone)]
enum GitHubAuth {
    Token(String),
    App(Arc<dyn InstallationTokenSource>),
}

/// GitHub HTTP client wrapper.
#[derive(Clone)]
pub struct GitHubClient {
    http: Client,
    base_api: String,
    auth: GitHubAuth,
    latest_commit_rule: LatestCommitRule,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mode = match self.auth {
            GitHubAuth::Token(_) => GitHubAuthMode::Token,
            GitHubAuth::App(_) => GitHubAuthMode::App,
        };
        f.debug_struct("GitHubClient")
            .field("base_api", &self.base_api)
            .field("auth_mode", &mode)
            .field("latest_commit_rule", &self.latest_commit_rule)
            .finish()
    }
}

impl GitHubClient {
    /// Builds a client from configuration, sharing one HTTP instance with the
    /// App token source when running in app mode.
    pub fn from_config(cfg: GitHubConfig) -> GitContextEngineResult<Self> {
        debug!(
            "Initializing GitHub client: mode={:?}, base_api={}",
            cfg.auth_mode, cfg.base_api
        );

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        let auth = match cfg.auth_mode {
            GitHubAuthMode::Token => GitHubAuth::Token(cfg.access_token.ok_or(
                crate::errors::GitContextEngineConfigError::MissingCredential(
                    "GITHUB_ACCESS_TOKEN",
                ),
            )?),
            GitHubAuthMode::App => {
                let jwt = cfg.app_jwt.ok_or(
                    crate::errors::GitContextEngineConfigError::MissingCredential(
                        "GITHUB_APP_JWT",
                    ),
                )?;
                GitHubAuth::App(Arc::new(AppJwtTokenSource::new(
                    http.clone(),
                    cfg.base_api.clone(),
                    jwt,
                )))
            }
        };

        Ok(Self {
            http,
            base_api: cfg.base_api,
            auth,
            latest_commit_rule: cfg.latest_commit_rule,
        })
    }

    /// Client authenticated with a personal access token.
    pub fn with_token(http: Client, base_api: String, token: String) -> Self {
        Self {
            http,
            base_api,
            auth: GitHubAuth::Token(token),
            latest_commit_rule: LatestCommitRule::default(),
        }
    }

    /// Client authenticated through GitHub App installation tokens.
    pub fn with_token_source(
        http: Client,
        base_api: String,
        tokens: Arc<dyn InstallationTokenSource>,
        latest_commit_rule: LatestCommitRule,
    ) -> Self {
        Self {
            http,
            base_api,
            auth: GitHubAuth::App(tokens),
            latest_commit_rule,
        }
    }

    /// Fetches the reviewable diff, propagating every failure.
    ///
    /// Token mode returns the PR's unified diff; app mode returns the files of
    /// the latest commit. Empty results are reported as validation errors.
    pub async fn try_fetch_diff(&self, pr: &PullRequestRef) -> GitContextEngineResult<DiffRecord> {
        let bearer = self.bearer_for(pr).await?;

        let record = match self.auth {
            GitHubAuth::Token(_) => DiffRecord::Unified(self.pull_diff(pr, &bearer).await?),
            GitHubAuth::App(_) => {
                let commits = self.pull_commits(pr, &bearer).await?;
                let latest = self.latest_commit_rule.select(&commits).ok_or_else(|| {
                    GitContextEngineError::Validation(format!("pull request {pr} has no commits"))
                })?;
                debug!(sha = %latest.sha, total = commits.len(), "latest commit selected");
                DiffRecord::Files(self.commit_files(pr, &latest.sha, &bearer).await?)
            }
        };

        if record.is_empty() {
            return Err(GitContextEngineError::Validation(format!(
                "pull request {pr} has an empty diff"
            )));
        }
        Ok(record)
    }

    /// Returns the `diff_url` of a pull request without downloading the diff.
    pub async fn pull_diff_url(&self, pr: &PullRequestRef) -> GitContextEngineResult<String> {
        let bearer = self.bearer_for(pr).await?;
        let url = self.repo_url(pr, &format!("pulls/{}", pr.pr_number));
        debug!("GitHub pull_diff_url: {}", url);

        let pull: GitHubPull = self
            .get(&url, &bearer, ACCEPT_JSON)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(pull.diff_url)
    }

    /// Creates an issue comment on the pull request.
    pub async fn create_issue_comment(
        &self,
        pr: &PullRequestRef,
        body: &str,
    ) -> GitContextEngineResult<()> {
        let bearer = self.bearer_for(pr).await?;
        let url = self.repo_url(pr, &format!("issues/{}/comments", pr.pr_number));
        debug!("GitHub create_issue_comment: url={}, len={}", url, body.len());

        self.http
            .post(url)
            .bearer_auth(&bearer)
            .header(header::ACCEPT, ACCEPT_JSON)
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&IssueCommentCreate { body })
            .send()
            .await?
            .error_for_status()?;

        info!(pr = %pr, "review comment posted");
        Ok(())
    }

    /* --------------------- Internals --------------------- */

    /// Resolves the bearer token; app mode needs the event's installation id
    /// and fails before any network I/O when it is missing.
    async fn bearer_for(&self, pr: &PullRequestRef) -> GitContextEngineResult<String> {
        match &self.auth {
            GitHubAuth::Token(token) => Ok(token.clone()),
            GitHubAuth::App(tokens) => {
                let id = pr
                    .installation_id
                    .ok_or(GitContextEngineError::MissingInstallationId)?;
                tokens.installation_token(id).await
            }
        }
    }

    fn repo_url(&self, pr: &PullRequestRef, tail: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.base_api, pr.owner, pr.repo_name, tail
        )
    }

    fn get(&self, url: &str, bearer: &str, accept: &'static str) -> RequestBuilder {
        self.http
            .get(url)
            .bearer_auth(bearer)
            .header(header::ACCEPT, accept)
            .header("X-GitHub-Api-Version", API_VERSION)
    }

    /// Downloads the unified diff of the whole pull request.
    async fn pull_diff(&self, pr: &PullRequestRef, bearer: &str) -> GitContextEngineResult<String> {
        let url = self.repo_url(pr, &format!("pulls/{}", pr.pr_number));
        debug!("GitHub pull_diff: {}", url);

        let text = self
            .get(&url, bearer, ACCEPT_DIFF)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(text)
    }

    /// Lists all commits of the pull request in GitHub's order, following
    /// `Link: rel="next"` pagination.
    async fn pull_commits(
        &self,
        pr: &PullRequestRef,
        bearer: &str,
    ) -> GitContextEngineResult<Vec<PrCommit>> {
        let mut next = Some(self.repo_url(
            pr,
            &format!("pulls/{}/commits?per_page=100", pr.pr_number),
        ));
        let mut commits = Vec::new();

        for _ in 0..MAX_COMMIT_PAGES {
            let Some(url) = next.take() else { break };
            debug!("GitHub pull_commits: {}", url);

            let resp = self
                .get(&url, bearer, ACCEPT_JSON)
                .send()
                .await?
                .error_for_status()?;
            next = resp
                .headers()
                .get(header::LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_page_url);

            let page: Vec<GitHubPrCommit> = resp.json().await?;
            commits.extend(page.into_iter().map(|c| PrCommit {
                sha: c.sha,
                committed_at: c.commit.committer.and_then(|p| p.date),
            }));
        }

        Ok(commits)
    }

    /// Fetches the changed files of a single commit.
    async fn commit_files(
        &self,
        pr: &PullRequestRef,
        sha: &str,
        bearer: &str,
    ) -> GitContextEngineResult<Vec<FilePatch>> {
        let url = self.repo_url(pr, &format!("commits/{sha}"));
        debug!("GitHub commit_files: {}", url);

        let commit: GitHubCommit = self
            .get(&url, bearer, ACCEPT_JSON)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let files = commit
            .files
            .ok_or_else(|| {
                GitContextEngineProviderError::InvalidResponse(format!(
                    "commit {sha} response has no `files`"
                ))
            })?
            .into_iter()
            .map(|f| FilePatch {
                filename: f.filename,
                patch: f.patch,
            })
            .collect();
        Ok(files)
    }
}

#[async_trait]
impl DiffSource for GitHubClient {
    async fn fetch_diff(&self, pr: &PullRequestRef) -> Option<DiffRecord> {
        match self.try_fetch_diff(pr).await {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(pr = %pr, error = %err, "failed to fetch PR diff");
                None
            }
        }
    }
}

#[async_trait]
impl CommentPoster for GitHubClient {
    async fn post_comment(&self, pr: &PullRequestRef, body: &str) -> GitContextEngineResult<()> {
        self.create_issue_comment(pr, body).await
    }
}

/// Extracts the `rel="next"` target from a `Link` header.
fn next_page_url(link: &str) -> Option<String> {
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().eq_ignore_ascii_case("rel=\"next\""));
        is_next.then(|| {
            target
                .trim()
                .trim_start_matches('<')
                .trim_end_matches('>')
                .to_string()
        })
    })
}

/// GitHub PR response (subset).
#[derive(Debug, Deserialize)]
struct GitHubPull {
    diff_url: String,
}

#[derive(Debug, Deserialize)]
struct GitHubPrCommit {
    sha: String,
    commit: GitHubCommitInner,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitInner {
    #[serde(default)]
    committer: Option<GitHubCommitPerson>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitPerson {
    #[serde(default)]
    date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommit {
    #[serde(default)]
    files: Option<Vec<GitHubCommitFile>>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitFile {
    filename: String,
    #[serde(default)]
    patch: Option<String>,
}

#[derive(Debug, Serialize)]
struct IssueCommentCreate<'a> {
    body: &'a str,
}
