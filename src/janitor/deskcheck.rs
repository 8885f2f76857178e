//! Desk-check detection on pull requests

use crate::error::Result;
use crate::platform::PlatformService;
use crate::types::PullRequest;
use tracing::debug;

/// Decides whether a PR carries a desk-check signal
#[derive(Debug, Clone)]
pub struct DeskCheck {
    label: String,
    phrase: String,
}

impl DeskCheck {
    /// Create an evaluator. Both values are compared case-insensitively.
    pub fn new(label: &str, phrase: &str) -> Self {
        Self {
            label: label.trim().to_lowercase(),
            phrase: phrase.trim().to_lowercase(),
        }
    }

    /// Whether any label equals the desk-check label, ignoring case
    pub fn has_label(&self, pr: &PullRequest) -> bool {
        !self.label.is_empty()
            && pr
                .labels
                .iter()
                .any(|name| name.to_lowercase() == self.label)
    }

    /// Whether any comment on the PR contains the desk-check phrase.
    ///
    /// An empty phrase short-circuits to `false` without fetching comments.
    pub async fn has_comment(
        &self,
        platform: &dyn PlatformService,
        pr: &PullRequest,
    ) -> Result<bool> {
        if self.phrase.is_empty() {
            return Ok(false);
        }

        let comments = platform.list_issue_comments(pr.number).await?;
        Ok(comments
            .iter()
            .any(|c| c.body.to_lowercase().contains(&self.phrase)))
    }

    /// Label check first, then comments
    pub async fn evaluate(
        &self,
        platform: &dyn PlatformService,
        pr: &PullRequest,
    ) -> Result<bool> {
        if self.has_label(pr) {
            debug!(pr_number = pr.number, "desk check satisfied by label");
            return Ok(true);
        }
        let found = self.has_comment(platform, pr).await?;
        debug!(pr_number = pr.number, found, "desk check comment scan");
        Ok(found)
    }
}
