//! Platform services for the hosting provider
//!
//! Provides the narrow interface the janitor needs for branch, PR and issue
//! operations.

mod github;

pub use github::GitHubService;

use crate::error::Result;
use crate::types::{Branch, Issue, IssueComment, PlatformConfig, PullRequest};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Platform service trait for repository hygiene operations
///
/// The reconciler only talks to the hosting provider through this trait,
/// so the same logic runs against GitHub or an in-memory double.
#[async_trait]
pub trait PlatformService: Send + Sync {
    /// Resolve the repository's default branch name
    async fn default_branch(&self) -> Result<String>;

    /// List every branch in the repository, in provider order
    async fn list_branches(&self) -> Result<Vec<Branch>>;

    /// Look up the timestamp of a commit.
    ///
    /// Returns the author date, falling back to the committer date, or
    /// `None` when the provider reports neither.
    async fn commit_date(&self, sha: &str) -> Result<Option<DateTime<Utc>>>;

    /// List pull requests in any state whose head is `head_branch`
    async fn list_prs_for_branch(&self, head_branch: &str) -> Result<Vec<PullRequest>>;

    /// Convert an open PR to draft.
    ///
    /// Returns the PR as reported by the provider after the mutation, so
    /// callers can confirm `is_draft` actually changed.
    async fn convert_pr_to_draft(&self, pr: &PullRequest) -> Result<PullRequest>;

    /// Close a PR without merging
    async fn close_pr(&self, pr_number: u64) -> Result<PullRequest>;

    /// List every comment on an issue or PR, oldest first
    async fn list_issue_comments(&self, issue_number: u64) -> Result<Vec<IssueComment>>;

    /// Open a new issue
    async fn create_issue(&self, title: &str, body: &str) -> Result<Issue>;

    /// Post a comment on an issue or PR
    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<()>;

    /// Delete the ref for a branch
    async fn delete_branch(&self, branch: &str) -> Result<()>;

    /// Get the platform configuration
    fn config(&self) -> &PlatformConfig;
}
