//! Core types for repo-janitor

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A branch as returned by the branch listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Branch {
    /// Branch name (unique within the repository)
    pub name: String,
    /// SHA of the head commit
    pub commit_sha: String,
    /// Head commit timestamp, if the listing carried one
    pub committed_at: Option<DateTime<Utc>>,
}

impl Branch {
    /// Whether this is the repository's default branch
    pub fn is_default(&self, default_branch: &str) -> bool {
        self.name == default_branch
    }
}

/// Pull request state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrState {
    /// PR is open
    Open,
    /// PR was closed (merged or not)
    Closed,
}

/// A pull request whose head is one of the scanned branches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PullRequest {
    /// PR number
    pub number: u64,
    /// Current state
    pub state: PrState,
    /// Whether PR is a draft
    pub is_draft: bool,
    /// Head branch name
    pub head_ref: String,
    /// Last time the PR was updated
    pub updated_at: Option<DateTime<Utc>>,
    /// Label names as reported by the provider
    pub labels: Vec<String>,
    /// GraphQL node ID (used for mutations)
    pub node_id: Option<String>,
}

impl PullRequest {
    /// Whether the PR is still open
    pub fn is_open(&self) -> bool {
        self.state == PrState::Open
    }
}

/// A comment on an issue or pull request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IssueComment {
    /// Login of the comment author
    pub author: String,
    /// Comment body text
    pub body: String,
    /// When the comment was created; votes are ordered by this
    pub created_at: DateTime<Utc>,
}

/// An issue created by the janitor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Issue number
    pub number: u64,
    /// Web URL for the issue
    pub html_url: String,
}

/// Repository coordinates on the hosting provider
#[derive(Debug, Clone)]
pub struct PlatformConfig {
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Custom host (None for github.com)
    pub host: Option<String>,
}

impl PlatformConfig {
    /// `owner/repo` slug
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}
