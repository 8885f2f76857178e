//! Mock platform service for testing
//!
//! These are test utilities - not all may be used in every test binary.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use repo_janitor::error::{Error, Result};
use repo_janitor::platform::PlatformService;
use repo_janitor::types::{Branch, Issue, IssueComment, PlatformConfig, PrState, PullRequest};
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Call record for `create_issue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateIssueCall {
    pub title: String,
    pub body: String,
}

/// Call record for `create_issue_comment`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateCommentCall {
    pub issue_number: u64,
    pub body: String,
}

/// A comment that only shows up after the issue has been polled a few times
#[derive(Debug, Clone)]
struct ScheduledComment {
    visible_after_calls: usize,
    comment: IssueComment,
}

/// Simple mock platform service for testing
///
/// Features:
/// - Configurable branches, PRs and comments
/// - Comments that appear after N listings (to simulate late votes)
/// - Call tracking for verification
/// - Error injection for failure path testing
pub struct MockPlatformService {
    config: PlatformConfig,
    default_branch: Mutex<String>,
    branches: Mutex<Vec<Branch>>,
    commit_dates: Mutex<HashMap<String, DateTime<Utc>>>,
    prs: Mutex<HashMap<String, Vec<PullRequest>>>,
    comments: Mutex<HashMap<u64, Vec<ScheduledComment>>>,
    next_issue_number: AtomicU64,
    // Call tracking
    commit_date_calls: Mutex<Vec<String>>,
    list_prs_calls: Mutex<Vec<String>>,
    list_comments_calls: Mutex<Vec<u64>>,
    draft_calls: Mutex<Vec<u64>>,
    close_calls: Mutex<Vec<u64>>,
    create_issue_calls: Mutex<Vec<CreateIssueCall>>,
    create_comment_calls: Mutex<Vec<CreateCommentCall>>,
    delete_calls: Mutex<Vec<String>>,
    // Error injection
    error_on_default_branch: Mutex<Option<String>>,
    error_on_list_branches: Mutex<Option<String>>,
    error_on_list_prs: Mutex<HashSet<String>>,
    error_on_delete: Mutex<HashSet<String>>,
    error_on_draft: Mutex<HashSet<u64>>,
    error_on_create_issue: Mutex<Option<String>>,
    draft_not_confirmed: Mutex<HashSet<u64>>,
}

impl MockPlatformService {
    /// Create a new mock with the given config
    pub fn with_config(config: PlatformConfig) -> Self {
        Self {
            config,
            default_branch: Mutex::new("main".to_string()),
            branches: Mutex::new(Vec::new()),
            commit_dates: Mutex::new(HashMap::new()),
            prs: Mutex::new(HashMap::new()),
            comments: Mutex::new(HashMap::new()),
            next_issue_number: AtomicU64::new(100),
            commit_date_calls: Mutex::new(Vec::new()),
            list_prs_calls: Mutex::new(Vec::new()),
            list_comments_calls: Mutex::new(Vec::new()),
            draft_calls: Mutex::new(Vec::new()),
            close_calls: Mutex::new(Vec::new()),
            create_issue_calls: Mutex::new(Vec::new()),
            create_comment_calls: Mutex::new(Vec::new()),
            delete_calls: Mutex::new(Vec::new()),
            error_on_default_branch: Mutex::new(None),
            error_on_list_branches: Mutex::new(None),
            error_on_list_prs: Mutex::new(HashSet::new()),
            error_on_delete: Mutex::new(HashSet::new()),
            error_on_draft: Mutex::new(HashSet::new()),
            error_on_create_issue: Mutex::new(None),
            draft_not_confirmed: Mutex::new(HashSet::new()),
        }
    }

    // === Setup methods ===

    /// Add a branch whose listing carries a commit date
    pub fn add_branch(&self, name: &str, committed_at: DateTime<Utc>) {
        self.branches.lock().unwrap().push(Branch {
            name: name.to_string(),
            commit_sha: format!("sha-{name}"),
            committed_at: Some(committed_at),
        });
    }

    /// Add a branch whose date must come from the commit lookup
    pub fn add_branch_without_date(&self, name: &str, lookup: Option<DateTime<Utc>>) {
        let sha = format!("sha-{name}");
        self.branches.lock().unwrap().push(Branch {
            name: name.to_string(),
            commit_sha: sha.clone(),
            committed_at: None,
        });
        if let Some(date) = lookup {
            self.commit_dates.lock().unwrap().insert(sha, date);
        }
    }

    /// Set the default branch name
    pub fn set_default_branch(&self, name: &str) {
        *self.default_branch.lock().unwrap() = name.to_string();
    }

    /// Attach a PR to its head branch
    pub fn add_pr(&self, pr: PullRequest) {
        self.prs
            .lock()
            .unwrap()
            .entry(pr.head_ref.clone())
            .or_default()
            .push(pr);
    }

    /// Add a comment visible from the first listing
    pub fn add_comment(&self, issue_number: u64, comment: IssueComment) {
        self.add_comment_after(issue_number, 0, comment);
    }

    /// Add a comment visible once the issue has been listed `calls` times
    pub fn add_comment_after(&self, issue_number: u64, calls: usize, comment: IssueComment) {
        self.comments
            .lock()
            .unwrap()
            .entry(issue_number)
            .or_default()
            .push(ScheduledComment {
                visible_after_calls: calls,
                comment,
            });
    }

    /// Number the next created issue will get
    pub fn next_issue_number(&self) -> u64 {
        self.next_issue_number.load(Ordering::SeqCst)
    }

    // === Error injection methods ===

    /// Make `default_branch` return an error
    pub fn fail_default_branch(&self, msg: &str) {
        *self.error_on_default_branch.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_branches` return an error
    pub fn fail_list_branches(&self, msg: &str) {
        *self.error_on_list_branches.lock().unwrap() = Some(msg.to_string());
    }

    /// Make `list_prs_for_branch` fail for one branch
    pub fn fail_list_prs(&self, branch: &str) {
        self.error_on_list_prs
            .lock()
            .unwrap()
            .insert(branch.to_string());
    }

    /// Make `delete_branch` fail for one branch
    pub fn fail_delete(&self, branch: &str) {
        self.error_on_delete
            .lock()
            .unwrap()
            .insert(branch.to_string());
    }

    /// Make `convert_pr_to_draft` fail for one PR
    pub fn fail_draft(&self, pr_number: u64) {
        self.error_on_draft.lock().unwrap().insert(pr_number);
    }

    /// Make `convert_pr_to_draft` succeed without the PR becoming a draft
    pub fn ignore_draft(&self, pr_number: u64) {
        self.draft_not_confirmed.lock().unwrap().insert(pr_number);
    }

    /// Make `create_issue` return an error
    pub fn fail_create_issue(&self, msg: &str) {
        *self.error_on_create_issue.lock().unwrap() = Some(msg.to_string());
    }

    // === Call verification methods ===

    pub fn get_commit_date_calls(&self) -> Vec<String> {
        self.commit_date_calls.lock().unwrap().clone()
    }

    pub fn get_list_prs_calls(&self) -> Vec<String> {
        self.list_prs_calls.lock().unwrap().clone()
    }

    pub fn get_list_comments_calls(&self) -> Vec<u64> {
        self.list_comments_calls.lock().unwrap().clone()
    }

    pub fn get_draft_calls(&self) -> Vec<u64> {
        self.draft_calls.lock().unwrap().clone()
    }

    pub fn get_close_calls(&self) -> Vec<u64> {
        self.close_calls.lock().unwrap().clone()
    }

    pub fn get_create_issue_calls(&self) -> Vec<CreateIssueCall> {
        self.create_issue_calls.lock().unwrap().clone()
    }

    pub fn get_create_comment_calls(&self) -> Vec<CreateCommentCall> {
        self.create_comment_calls.lock().unwrap().clone()
    }

    pub fn get_delete_calls(&self) -> Vec<String> {
        self.delete_calls.lock().unwrap().clone()
    }

    /// Count of every mutating call made so far
    pub fn mutation_count(&self) -> usize {
        self.draft_calls.lock().unwrap().len()
            + self.close_calls.lock().unwrap().len()
            + self.create_issue_calls.lock().unwrap().len()
            + self.create_comment_calls.lock().unwrap().len()
            + self.delete_calls.lock().unwrap().len()
    }

    /// Assert that `delete_branch` was called for a branch
    pub fn assert_deleted(&self, branch: &str) {
        let calls = self.get_delete_calls();
        assert!(
            calls.iter().any(|c| c == branch),
            "Expected delete_branch({branch}) but got: {calls:?}"
        );
    }

    /// Assert that `delete_branch` was NOT called for a branch
    pub fn assert_not_deleted(&self, branch: &str) {
        let calls = self.get_delete_calls();
        assert!(
            !calls.iter().any(|c| c == branch),
            "Expected delete_branch({branch}) NOT to be called but it was: {calls:?}"
        );
    }
}

#[async_trait]
impl PlatformService for MockPlatformService {
    async fn default_branch(&self) -> Result<String> {
        if let Some(msg) = self.error_on_default_branch.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.default_branch.lock().unwrap().clone())
    }

    async fn list_branches(&self) -> Result<Vec<Branch>> {
        if let Some(msg) = self.error_on_list_branches.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }
        Ok(self.branches.lock().unwrap().clone())
    }

    async fn commit_date(&self, sha: &str) -> Result<Option<DateTime<Utc>>> {
        self.commit_date_calls.lock().unwrap().push(sha.to_string());
        Ok(self.commit_dates.lock().unwrap().get(sha).copied())
    }

    async fn list_prs_for_branch(&self, head_branch: &str) -> Result<Vec<PullRequest>> {
        self.list_prs_calls
            .lock()
            .unwrap()
            .push(head_branch.to_string());

        if self.error_on_list_prs.lock().unwrap().contains(head_branch) {
            return Err(Error::Platform(format!("list PRs failed for {head_branch}")));
        }

        let prs = self.prs.lock().unwrap();
        Ok(prs.get(head_branch).cloned().unwrap_or_default())
    }

    async fn convert_pr_to_draft(&self, pr: &PullRequest) -> Result<PullRequest> {
        self.draft_calls.lock().unwrap().push(pr.number);

        if self.error_on_draft.lock().unwrap().contains(&pr.number) {
            return Err(Error::Platform(format!("draft failed for #{}", pr.number)));
        }

        let confirmed = !self.draft_not_confirmed.lock().unwrap().contains(&pr.number);
        let mut updated = pr.clone();
        updated.is_draft = confirmed;
        Ok(updated)
    }

    async fn close_pr(&self, pr_number: u64) -> Result<PullRequest> {
        self.close_calls.lock().unwrap().push(pr_number);

        let prs = self.prs.lock().unwrap();
        let mut pr = prs
            .values()
            .flatten()
            .find(|pr| pr.number == pr_number)
            .cloned()
            .ok_or_else(|| Error::Platform(format!("no PR #{pr_number}")))?;
        pr.state = PrState::Closed;
        Ok(pr)
    }

    async fn list_issue_comments(&self, issue_number: u64) -> Result<Vec<IssueComment>> {
        let seen = {
            let mut calls = self.list_comments_calls.lock().unwrap();
            let seen = calls.iter().filter(|n| **n == issue_number).count();
            calls.push(issue_number);
            seen
        };

        let comments = self.comments.lock().unwrap();
        Ok(comments
            .get(&issue_number)
            .map(|scheduled| {
                scheduled
                    .iter()
                    .filter(|s| s.visible_after_calls <= seen)
                    .map(|s| s.comment.clone())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_issue(&self, title: &str, body: &str) -> Result<Issue> {
        self.create_issue_calls.lock().unwrap().push(CreateIssueCall {
            title: title.to_string(),
            body: body.to_string(),
        });

        if let Some(msg) = self.error_on_create_issue.lock().unwrap().as_ref() {
            return Err(Error::Platform(msg.clone()));
        }

        let number = self.next_issue_number.fetch_add(1, Ordering::SeqCst);
        Ok(Issue {
            number,
            html_url: format!("https://github.com/test/repo/issues/{number}"),
        })
    }

    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<()> {
        self.create_comment_calls
            .lock()
            .unwrap()
            .push(CreateCommentCall {
                issue_number,
                body: body.to_string(),
            });
        Ok(())
    }

    async fn delete_branch(&self, branch: &str) -> Result<()> {
        self.delete_calls.lock().unwrap().push(branch.to_string());

        if self.error_on_delete.lock().unwrap().contains(branch) {
            return Err(Error::Platform(format!(
                "Reference does not exist: heads/{branch}"
            )));
        }
        Ok(())
    }

    fn config(&self) -> &PlatformConfig {
        &self.config
    }
}
