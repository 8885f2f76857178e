//! Top-level reconciliation loop
//!
//! Visits every branch in listing order and routes it:
//!
//! 1. default branch or deny-pattern match: skipped
//! 2. unknown age or fresh: skipped
//! 3. stale with open PRs: each PR goes through the draft/close pipeline
//! 4. stale without open PRs: deleted, or queued for approval when allow
//!    patterns are configured and the name matches none of them
//!
//! Failures on a single branch or PR are logged and counted; only failing to
//! resolve the default branch or list branches aborts the run.

use crate::clock::Clock;
use crate::config::JanitorConfig;
use crate::error::Result;
use crate::janitor::approval::{ApprovalOutcome, ApprovalWorkflow, DEFAULT_POLL_INTERVAL};
use crate::janitor::delete::BranchDeleter;
use crate::janitor::deskcheck::DeskCheck;
use crate::janitor::patterns::PatternSet;
use crate::janitor::staleness::Staleness;
use crate::janitor::summary::Summary;
use crate::platform::PlatformService;
use crate::types::{Branch, PullRequest};
use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Where a stale branch without open PRs ends up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionRoute {
    /// Delete right away
    Delete,
    /// Needs a human vote first
    NeedsApproval,
}

/// Per-PR action decided by the draft/close pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrAction {
    /// Open without desk check: convert to draft
    ConvertToDraft,
    /// Draft older than the cutoff: close
    Close,
    /// Nothing to do this pass
    Keep,
}

/// Result of a full run
#[derive(Debug, Clone)]
pub struct ReconcileReport {
    /// Counters for the run
    pub summary: Summary,
    /// Approval round outcome, if a batch was escalated
    pub approval: Option<ApprovalOutcome>,
}

/// Drives branch and PR hygiene for one repository
pub struct BranchReconciler<'a> {
    platform: &'a dyn PlatformService,
    clock: &'a dyn Clock,
    config: &'a JanitorConfig,
    allow: PatternSet,
    deny: PatternSet,
    desk_check: DeskCheck,
    poll_interval: Duration,
}

impl<'a> BranchReconciler<'a> {
    /// Build a reconciler, compiling the configured patterns.
    ///
    /// Malformed patterns fail here, before any API call is made.
    pub fn new(
        platform: &'a dyn PlatformService,
        clock: &'a dyn Clock,
        config: &'a JanitorConfig,
    ) -> Result<Self> {
        Ok(Self {
            platform,
            clock,
            config,
            allow: PatternSet::compile(&config.allow_patterns)?,
            deny: PatternSet::compile(&config.deny_patterns)?,
            desk_check: DeskCheck::new(&config.desk_check_label, &config.desk_check_phrase),
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the approval poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Whether the branch is protected by a deny pattern
    pub fn is_denied(&self, name: &str) -> bool {
        !self.deny.is_empty() && self.deny.matches(name)
    }

    /// Route a stale branch that has no open PRs
    pub fn deletion_route(&self, name: &str) -> DeletionRoute {
        if !self.allow.is_empty() && !self.allow.matches(name) {
            DeletionRoute::NeedsApproval
        } else {
            DeletionRoute::Delete
        }
    }

    /// Run one reconciliation pass over every branch
    pub async fn run(&self) -> Result<ReconcileReport> {
        let dry_run = self.config.dry_run;
        let now = self.clock.now();
        let mut summary = Summary {
            dry_run,
            ..Summary::default()
        };
        let mut approval_batch = Vec::new();

        let default_branch = self.platform.default_branch().await?;
        let branches = self.platform.list_branches().await?;
        info!(
            repo = %self.platform.config().slug(),
            default_branch = %default_branch,
            count = branches.len(),
            allow_patterns = self.allow.len(),
            deny_patterns = self.deny.len(),
            dry_run,
            "reconciling branches"
        );

        for branch in &branches {
            if branch.is_default(&default_branch) {
                continue;
            }
            summary.scanned += 1;
            self.reconcile_branch(branch, now, &mut summary, &mut approval_batch)
                .await;
        }

        summary.pending_approval = approval_batch.len();
        let approval = self.escalate(&approval_batch, &mut summary).await;

        info!(
            scanned = summary.scanned,
            stale = summary.stale,
            deleted = summary.deleted,
            pending_approval = summary.pending_approval,
            prs_drafted = summary.prs_drafted,
            prs_closed = summary.prs_closed,
            errors = summary.errors,
            "reconciliation complete"
        );

        Ok(ReconcileReport { summary, approval })
    }

    async fn reconcile_branch(
        &self,
        branch: &Branch,
        now: DateTime<Utc>,
        summary: &mut Summary,
        approval_batch: &mut Vec<String>,
    ) {
        let name = branch.name.as_str();

        if self.is_denied(name) {
            debug!(branch = %name, "skipping branch matching deny pattern");
            return;
        }

        let Some(committed_at) = self.resolve_commit_date(branch, summary).await else {
            info!(branch = %name, "skipping branch with unknown commit date");
            summary.unknown_age += 1;
            return;
        };

        if !Staleness::classify(Some(committed_at), now, self.config.cutoff()).is_stale() {
            debug!(branch = %name, %committed_at, "branch is fresh");
            return;
        }
        summary.stale += 1;

        let prs = match self.platform.list_prs_for_branch(name).await {
            Ok(prs) => prs,
            Err(e) => {
                warn!(branch = %name, error = %e, "failed to list PRs");
                summary.errors += 1;
                return;
            }
        };

        let open_prs: Vec<&PullRequest> = prs.iter().filter(|pr| pr.is_open()).collect();
        if !open_prs.is_empty() {
            for pr in open_prs {
                self.reconcile_pr(pr, now, summary).await;
            }
            return;
        }

        match self.deletion_route(name) {
            DeletionRoute::NeedsApproval => {
                info!(branch = %name, "stale branch outside allow patterns, needs approval");
                approval_batch.push(branch.name.clone());
            }
            DeletionRoute::Delete => {
                info!(branch = %name, "deleting stale branch with no open PRs");
                let deleted = BranchDeleter::new(self.platform, "direct", self.config.dry_run)
                    .delete_all(std::slice::from_ref(&branch.name))
                    .await;
                if deleted.is_empty() {
                    summary.errors += 1;
                }
                summary.deleted += deleted.len();
            }
        }
    }

    /// Listing timestamp, else a commit lookup. Lookup failures count as unknown.
    async fn resolve_commit_date(
        &self,
        branch: &Branch,
        summary: &mut Summary,
    ) -> Option<DateTime<Utc>> {
        if branch.committed_at.is_some() {
            return branch.committed_at;
        }

        match self.platform.commit_date(&branch.commit_sha).await {
            Ok(date) => date,
            Err(e) => {
                warn!(
                    branch = %branch.name,
                    sha = %branch.commit_sha,
                    error = %e,
                    "commit lookup failed"
                );
                summary.errors += 1;
                None
            }
        }
    }

    /// Decide what to do with an open PR.
    ///
    /// `has_desk_check` is only consulted for non-draft PRs.
    pub fn pr_action(
        &self,
        pr: &PullRequest,
        has_desk_check: bool,
        now: DateTime<Utc>,
    ) -> PrAction {
        if pr.is_draft {
            if Staleness::classify(pr.updated_at, now, self.config.cutoff()).is_stale() {
                PrAction::Close
            } else {
                PrAction::Keep
            }
        } else if has_desk_check {
            PrAction::Keep
        } else {
            PrAction::ConvertToDraft
        }
    }

    async fn reconcile_pr(&self, pr: &PullRequest, now: DateTime<Utc>, summary: &mut Summary) {
        let has_desk_check = if pr.is_draft {
            false
        } else {
            match self.desk_check.evaluate(self.platform, pr).await {
                Ok(found) => found,
                Err(e) => {
                    warn!(
                        pr_number = pr.number,
                        branch = %pr.head_ref,
                        error = %e,
                        "desk check failed"
                    );
                    summary.errors += 1;
                    return;
                }
            }
        };

        match self.pr_action(pr, has_desk_check, now) {
            PrAction::Keep => {
                debug!(pr_number = pr.number, is_draft = pr.is_draft, "no action for PR");
            }
            PrAction::ConvertToDraft => self.convert_to_draft(pr, summary).await,
            PrAction::Close => self.close_stale_draft(pr, summary).await,
        }
    }

    async fn convert_to_draft(&self, pr: &PullRequest, summary: &mut Summary) {
        if self.config.dry_run {
            info!(
                pr_number = pr.number,
                dry_run = true,
                "would convert PR to draft (no desk check)"
            );
            summary.prs_drafted += 1;
            return;
        }

        info!(pr_number = pr.number, "converting PR to draft (no desk check)");
        match self.platform.convert_pr_to_draft(pr).await {
            Ok(updated) if updated.is_draft => summary.prs_drafted += 1,
            Ok(_) => {
                warn!(pr_number = pr.number, "provider did not confirm draft state");
                summary.errors += 1;
            }
            Err(e) => {
                warn!(pr_number = pr.number, error = %e, "failed to convert PR to draft");
                summary.errors += 1;
            }
        }
    }

    async fn close_stale_draft(&self, pr: &PullRequest, summary: &mut Summary) {
        if self.config.dry_run {
            info!(pr_number = pr.number, dry_run = true, "would close stale draft PR");
            summary.prs_closed += 1;
            return;
        }

        info!(pr_number = pr.number, "closing stale draft PR");
        match self.platform.close_pr(pr.number).await {
            Ok(_) => summary.prs_closed += 1,
            Err(e) => {
                warn!(pr_number = pr.number, error = %e, "failed to close PR");
                summary.errors += 1;
            }
        }
    }

    async fn escalate(&self, batch: &[String], summary: &mut Summary) -> Option<ApprovalOutcome> {
        let workflow = ApprovalWorkflow::new(
            self.platform,
            self.clock,
            &self.config.approvers,
            self.config.approval_wait_minutes,
            self.config.dry_run,
        )
        .with_poll_interval(self.poll_interval);

        match workflow.run(batch).await {
            Ok(Some(outcome)) => {
                if let ApprovalOutcome::Completed(ref report) = outcome {
                    summary.deleted += report.deleted_branches.len();
                    summary.approval_issue = Some(report.issue_number);
                }
                Some(outcome)
            }
            Ok(None) => None,
            Err(e) => {
                warn!(count = batch.len(), error = %e, "approval workflow failed");
                summary.errors += 1;
                None
            }
        }
    }
}
