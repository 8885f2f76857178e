//! Human approval for branch deletion via an issue-comment vote
//!
//! Flow: open an issue listing the candidate branches, poll its comments
//! until a qualifying vote appears or the wait expires, delete unless the
//! vote was `deny`, then report the outcome on the issue.

use crate::clock::Clock;
use crate::error::Result;
use crate::janitor::delete::BranchDeleter;
use crate::platform::PlatformService;
use crate::types::IssueComment;
use chrono::{DateTime, TimeDelta, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{info, warn};

/// Default delay between polls of the approval issue
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

static DENY_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(deny|no|skip)\b").expect("static regex"));
static APPROVE_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(approve|yes|delete)\b").expect("static regex"));

/// A vote cast on the approval issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Delete the branches
    Approve,
    /// Keep the branches
    Deny,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Approve => write!(f, "approve"),
            Self::Deny => write!(f, "deny"),
        }
    }
}

/// Verdict expressed by a single comment body, if any
fn verdict(body: &str) -> Option<Decision> {
    let body = body.to_lowercase();
    if DENY_WORDS.is_match(&body) {
        Some(Decision::Deny)
    } else if APPROVE_WORDS.is_match(&body) {
        Some(Decision::Approve)
    } else {
        None
    }
}

/// Resolve the decision from comments in chronological order.
///
/// Later qualifying comments override earlier ones. A comment qualifies if
/// its author is an approver, or if `approvers` is empty. Comments are
/// ordered by `created_at`; ties keep listing order.
pub fn resolve_decision(comments: &[IssueComment], approvers: &[String]) -> Option<Decision> {
    let mut ordered: Vec<&IssueComment> = comments.iter().collect();
    ordered.sort_by_key(|c| c.created_at);

    ordered
        .into_iter()
        .filter(|c| {
            approvers.is_empty() || approvers.iter().any(|a| a.eq_ignore_ascii_case(&c.author))
        })
        .filter_map(|c| verdict(&c.body))
        .last()
}

/// Title of the approval issue
pub fn approval_title(branch_count: usize) -> String {
    format!("Repo Janitor approval: delete {branch_count} branches")
}

/// Body of the approval issue
pub fn approval_body(branches: &[String], approvers: &[String]) -> String {
    let mut lines = vec![
        "The repo janitor found stale branches that do not match the allow patterns.".to_string(),
        "Reply with `approve` to delete them or `deny` to keep them.".to_string(),
        String::new(),
        "Branches:".to_string(),
        "```".to_string(),
    ];
    lines.extend(branches.iter().cloned());
    lines.push("```".to_string());

    if !approvers.is_empty() {
        let mentions: Vec<String> = approvers.iter().map(|u| format!("@{u}")).collect();
        lines.push(String::new());
        lines.push(format!("Requested reviewers: {}", mentions.join(" ")));
    }

    lines.join("\n")
}

/// Body of the follow-up comment reporting the outcome
pub fn report_body(
    decision: Option<Decision>,
    wait_minutes: u64,
    should_delete: bool,
    deleted: &[String],
) -> String {
    let mut lines = vec![match decision {
        Some(d) => format!("Decision: {d}."),
        None => format!("No response in {wait_minutes} minutes. Defaulting to delete."),
    }];

    lines.push(String::new());
    if should_delete {
        lines.push("Deleted branches:".to_string());
        lines.push("```".to_string());
        lines.extend(deleted.iter().cloned());
        lines.push("```".to_string());
    } else {
        lines.push("No branches were deleted.".to_string());
    }

    lines.join("\n")
}

/// Result of a completed approval round
#[derive(Debug, Clone, Serialize)]
pub struct ApprovalReport {
    /// Number of the approval issue
    pub issue_number: u64,
    /// Web URL of the approval issue
    pub issue_url: String,
    /// Resolved vote, `None` if the wait expired
    pub decision: Option<Decision>,
    /// Branches actually deleted
    pub deleted_branches: Vec<String>,
    /// Whether deletion was attempted
    pub should_delete: bool,
}

/// What the approval workflow did
#[derive(Debug, Clone)]
pub enum ApprovalOutcome {
    /// Dry run: no issue was created
    DryRun {
        /// Branches that would have been put to a vote
        branches: Vec<String>,
    },
    /// An issue was created and resolved
    Completed(ApprovalReport),
}

/// Runs one approval round for a batch of branches
pub struct ApprovalWorkflow<'a> {
    platform: &'a dyn PlatformService,
    clock: &'a dyn Clock,
    approvers: &'a [String],
    wait_minutes: u64,
    poll_interval: Duration,
    dry_run: bool,
}

impl<'a> ApprovalWorkflow<'a> {
    /// Create a workflow that polls once a minute
    pub const fn new(
        platform: &'a dyn PlatformService,
        clock: &'a dyn Clock,
        approvers: &'a [String],
        wait_minutes: u64,
        dry_run: bool,
    ) -> Self {
        Self {
            platform,
            clock,
            approvers,
            wait_minutes,
            poll_interval: DEFAULT_POLL_INTERVAL,
            dry_run,
        }
    }

    /// Override the delay between polls
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Put `branches` to a vote and act on the result.
    ///
    /// Returns `None` for an empty batch. Blocks until a decision arrives
    /// or the wait expires. Anything but an explicit `deny` deletes the
    /// whole batch, including a timeout with no votes.
    pub async fn run(&self, branches: &[String]) -> Result<Option<ApprovalOutcome>> {
        if branches.is_empty() {
            return Ok(None);
        }

        if self.dry_run {
            info!(
                dry_run = true,
                branches = %branches.join(", "),
                "would create approval issue"
            );
            return Ok(Some(ApprovalOutcome::DryRun {
                branches: branches.to_vec(),
            }));
        }

        let issue = self
            .platform
            .create_issue(
                &approval_title(branches.len()),
                &approval_body(branches, self.approvers),
            )
            .await?;
        info!(issue_number = issue.number, url = %issue.html_url, "created approval issue");

        let decision = self.poll_for_decision(issue.number).await;
        let should_delete = decision != Some(Decision::Deny);

        let deleted_branches = if should_delete {
            BranchDeleter::new(self.platform, "approval", false)
                .delete_all(branches)
                .await
        } else {
            info!(issue_number = issue.number, "deletion denied");
            Vec::new()
        };

        let report = report_body(decision, self.wait_minutes, should_delete, &deleted_branches);
        if let Err(e) = self.platform.create_issue_comment(issue.number, &report).await {
            warn!(issue_number = issue.number, error = %e, "failed to post approval report");
        }

        Ok(Some(ApprovalOutcome::Completed(ApprovalReport {
            issue_number: issue.number,
            issue_url: issue.html_url,
            decision,
            deleted_branches,
            should_delete,
        })))
    }

    async fn poll_for_decision(&self, issue_number: u64) -> Option<Decision> {
        let deadline = self.deadline();

        while self.clock.now() < deadline {
            match self.platform.list_issue_comments(issue_number).await {
                Ok(comments) => {
                    if let Some(decision) = resolve_decision(&comments, self.approvers) {
                        info!(issue_number, %decision, "approval decision received");
                        return Some(decision);
                    }
                }
                Err(e) => {
                    warn!(issue_number, error = %e, "failed to poll approval comments");
                }
            }
            self.clock.sleep(self.poll_interval).await;
        }

        info!(
            issue_number,
            wait_minutes = self.wait_minutes,
            "no approval response before deadline"
        );
        None
    }

    /// End of the voting window. A wait too large to represent has no cap.
    fn deadline(&self) -> DateTime<Utc> {
        i64::try_from(self.wait_minutes)
            .ok()
            .and_then(TimeDelta::try_minutes)
            .and_then(|wait| self.clock.now().checked_add_signed(wait))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}
