//! Run-scoped counters

use serde::Serialize;

/// Counts of what a reconciliation run did (or would have done in a dry run)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Non-default branches examined
    pub scanned: usize,
    /// Branches past the age cutoff
    pub stale: usize,
    /// Branches skipped because their age could not be determined
    pub unknown_age: usize,
    /// Branches put to an approval vote
    pub pending_approval: usize,
    /// Branches deleted, directly or after approval
    pub deleted: usize,
    /// PRs converted to draft
    pub prs_drafted: usize,
    /// Stale draft PRs closed
    pub prs_closed: usize,
    /// Per-item failures that were logged and skipped
    pub errors: usize,
    /// Whether mutations were suppressed
    pub dry_run: bool,
    /// Approval issue opened during the run
    pub approval_issue: Option<u64>,
}
