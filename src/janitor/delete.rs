//! Batch branch deletion

use crate::platform::PlatformService;
use tracing::{info, warn};

/// Deletes branch refs one at a time, isolating failures per branch
pub struct BranchDeleter<'a> {
    platform: &'a dyn PlatformService,
    source: &'a str,
    dry_run: bool,
}

impl<'a> BranchDeleter<'a> {
    /// Create a deleter. `source` names the caller in log lines.
    pub fn new(platform: &'a dyn PlatformService, source: &'a str, dry_run: bool) -> Self {
        Self {
            platform,
            source,
            dry_run,
        }
    }

    /// Delete every branch in `branches`, returning the ones that were deleted.
    ///
    /// A failed deletion is logged and left out of the result; the rest of
    /// the batch still runs. In dry-run mode nothing is deleted and every
    /// name is returned as if it had been.
    pub async fn delete_all(&self, branches: &[String]) -> Vec<String> {
        info!(source = self.source, count = branches.len(), "deleting branches");
        let mut deleted = Vec::with_capacity(branches.len());

        for branch in branches {
            if self.dry_run {
                info!(
                    source = self.source,
                    branch = %branch,
                    dry_run = true,
                    "would delete branch"
                );
                deleted.push(branch.clone());
                continue;
            }

            match self.platform.delete_branch(branch).await {
                Ok(()) => {
                    info!(source = self.source, branch = %branch, "deleted branch");
                    deleted.push(branch.clone());
                }
                Err(e) => {
                    warn!(
                        source = self.source,
                        branch = %branch,
                        error = %e,
                        "failed to delete branch"
                    );
                }
            }
        }

        deleted
    }
}
