//! Data model for pull requests and the diffs handed to the reviewer.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::GitContextEngineConfigError;

/// Text used in prompts for files GitHub returned without a patch.
pub const MISSING_PATCH_PLACEHOLDER: &str = "(patch unavailable: binary or too large)";

/// A pull request inside a GitHub repository.
///
/// `installation_id` is only present for events delivered to a GitHub App.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequestRef {
    pub owner: String,
    pub repo_name: String,
    pub pr_number: u64,
    pub installation_id: Option<u64>,
}

impl fmt::Display for PullRequestRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo_name, self.pr_number)
    }
}

/// One changed file of a commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatch {
    pub filename: String,
    /// Absent for binary files and for patches GitHub considers too large.
    pub patch: Option<String>,
}

impl FilePatch {
    /// Patch text for prompts; binary or missing patches become a placeholder.
    pub fn patch_or_placeholder(&self) -> &str {
        match self.patch.as_deref() {
            Some(p) if !p.trim().is_empty() && !looks_like_binary_patch(p) => p,
            _ => MISSING_PATCH_PLACEHOLDER,
        }
    }
}

/// What the reviewer gets to see for a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffRecord {
    /// Raw unified diff of the whole pull request.
    Unified(String),
    /// Changed files of the latest commit, in GitHub's order.
    Files(Vec<FilePatch>),
}

impl DiffRecord {
    /// True if there is nothing worth sending to a reviewer.
    pub fn is_empty(&self) -> bool {
        match self {
            DiffRecord::Unified(text) => text.trim().is_empty(),
            DiffRecord::Files(files) => files.is_empty(),
        }
    }
}

/// How "latest commit" is chosen from a pull request's commit list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LatestCommitRule {
    /// Last element of the list as returned by GitHub (oldest first).
    #[default]
    ListOrder,
    /// Greatest committer timestamp; commits without one rank lowest and
    /// ties keep list order.
    CommitterDate,
}

impl FromStr for LatestCommitRule {
    type Err = GitContextEngineConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list_order" | "list" => Ok(LatestCommitRule::ListOrder),
            "committer_date" | "date" => Ok(LatestCommitRule::CommitterDate),
            other => Err(GitContextEngineConfigError::InvalidValue {
                var: "GITHUB_LATEST_COMMIT_RULE",
                value: other.to_string(),
            }),
        }
    }
}

/// Commit as listed on a pull request, reduced to what selection needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrCommit {
    pub sha: String,
    pub committed_at: Option<DateTime<Utc>>,
}

impl LatestCommitRule {
    /// Picks the latest commit; `None` only for an empty list.
    pub fn select<'a>(&self, commits: &'a [PrCommit]) -> Option<&'a PrCommit> {
        match self {
            LatestCommitRule::ListOrder => commits.last(),
            // `max_by_key` returns the last maximum, so ties keep list order.
            LatestCommitRule::CommitterDate => commits.iter().max_by_key(|c| c.committed_at),
        }
    }
}

/// Heuristic to detect whether a patch text represents binary content.
pub fn looks_like_binary_patch(diff: &str) -> bool {
    if diff.contains("GIT binary patch") {
        return true;
    }
    if diff.contains("Binary files") && diff.contains(" differ") {
        return true;
    }
    diff.bytes().any(|b| b == 0)
}
