//! GitHub side of the review backend.
//!
//! Fetches what a reviewer needs to see for a pull request (unified diff or
//! the latest commit's per-file patches) and posts the answer back as an
//! issue comment. Callers depend on the [`DiffSource`] and [`CommentPoster`]
//! traits so tests can swap the network out.

pub mod errors;
pub mod git_providers;

pub use errors::{GitContextEngineError, GitContextEngineResult};
pub use git_providers::{
    CommentPoster, DiffSource, GitHubAuthMode, GitHubConfig,
    app_auth::{AppJwtTokenSource, InstallationTokenSource},
    disabled::DisabledGitHub,
    github::GitHubClient,
    types::{DiffRecord, FilePatch, LatestCommitRule, PullRequestRef},
};
