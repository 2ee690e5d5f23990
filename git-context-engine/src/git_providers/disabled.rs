//! Stand-in used when no GitHub credential is configured.

use async_trait::async_trait;
use tracing::warn;

use crate::errors::{GitContextEngineConfigError, GitContextEngineResult};
use crate::git_providers::{CommentPoster, DiffSource, DiffRecord, PullRequestRef};

/// Never reaches the network: diffs are unavailable and comments fail.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledGitHub;

#[async_trait]
impl DiffSource for DisabledGitHub {
    async fn fetch_diff(&self, pr: &PullRequestRef) -> Option<DiffRecord> {
        warn!(pr = %pr, "GitHub is not configured; no diff available");
        None
    }
}

#[async_trait]
impl CommentPoster for DisabledGitHub {
    async fn post_comment(&self, _pr: &PullRequestRef, _body: &str) -> GitContextEngineResult<()> {
        Err(GitContextEngineConfigError::MissingCredential("GITHUB_ACCESS_TOKEN").into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GitContextEngineError;

    fn pr() -> PullRequestRef {
        PullRequestRef {
            owner: "octo".into(),
            repo_name: "demo".into(),
            pr_number: 3,
            installation_id: None,
        }
    }

    #[tokio::test]
    async fn no_diff_and_comment_is_a_config_error() {
        assert!(DisabledGitHub.fetch_diff(&pr()).await.is_none());
        assert!(matches!(
            DisabledGitHub.post_comment(&pr(), "hi").await,
            Err(GitContextEngineError::Config(
                GitContextEngineConfigError::MissingCredential(_)
            ))
        ));
    }
}
