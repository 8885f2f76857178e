//! Janitor configuration
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! overrides from command-line flags or environment variables.

use crate::error::{Error, Result};
use crate::janitor::PatternSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const DEFAULT_BRANCH_AGE_DAYS: u32 = 7;
const DEFAULT_DESK_CHECK_LABEL: &str = "desk-check";
const DEFAULT_DESK_CHECK_PHRASE: &str = "desk check";
const DEFAULT_APPROVAL_WAIT_MINUTES: u64 = 20;

/// Configuration consumed by the reconciler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JanitorConfig {
    /// Branches whose head commit is older than this many days are stale
    pub branch_age_days: u32,
    /// Stale branches not matching any of these need approval before deletion
    pub allow_patterns: Vec<String>,
    /// Branches matching any of these are never touched
    pub deny_patterns: Vec<String>,
    /// Label that marks a PR as desk-checked
    pub desk_check_label: String,
    /// Comment phrase that marks a PR as desk-checked (empty disables)
    pub desk_check_phrase: String,
    /// Users allowed to vote on approval issues (empty means anyone)
    pub approvers: Vec<String>,
    /// How long to wait for a vote before defaulting to delete
    pub approval_wait_minutes: u64,
    /// Log intended mutations without performing them
    pub dry_run: bool,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            branch_age_days: DEFAULT_BRANCH_AGE_DAYS,
            allow_patterns: Vec::new(),
            deny_patterns: Vec::new(),
            desk_check_label: DEFAULT_DESK_CHECK_LABEL.to_string(),
            desk_check_phrase: DEFAULT_DESK_CHECK_PHRASE.to_string(),
            approvers: Vec::new(),
            approval_wait_minutes: DEFAULT_APPROVAL_WAIT_MINUTES,
            dry_run: false,
        }
    }
}

impl JanitorConfig {
    /// Age past which a branch or draft PR is stale
    pub fn cutoff(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.branch_age_days))
    }

    /// Check values that can be rejected without touching the network.
    ///
    /// Compiles both pattern lists so malformed regexes surface before any
    /// API call.
    pub fn validate(&self) -> Result<()> {
        PatternSet::compile(&self.allow_patterns)?;
        PatternSet::compile(&self.deny_patterns)?;
        Ok(())
    }

    /// Canonicalize values: lowercase label and phrase, strip `@` from approvers.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.desk_check_label = self.desk_check_label.trim().to_lowercase();
        self.desk_check_phrase = self.desk_check_phrase.trim().to_lowercase();
        self.approvers = self
            .approvers
            .iter()
            .map(|user| user.trim().trim_start_matches('@').to_string())
            .filter(|user| !user.is_empty())
            .collect();
        self.allow_patterns = trim_entries(&self.allow_patterns);
        self.deny_patterns = trim_entries(&self.deny_patterns);
        self
    }
}

fn trim_entries(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn parse_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse an `owner/name` repository slug.
pub fn parse_repo_slug(slug: &str) -> Result<(String, String)> {
    let trimmed = slug.trim().trim_end_matches('/');
    match trimmed.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::Config(format!(
            "repository must be given as owner/name, got '{slug}'"
        ))),
    }
}

/// Load configuration from an optional TOML file.
///
/// Returns defaults when no path is given. A path that was given but
/// cannot be read is an error.
pub fn load_config(path: Option<&Path>) -> Result<JanitorConfig> {
    let Some(path) = path else {
        return Ok(JanitorConfig::default());
    };

    let content = fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;

    let config: JanitorConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("failed to parse {}: {e}", path.display())))?;

    Ok(config)
}

/// Values supplied on the command line or through the environment.
///
/// List-valued fields hold the raw comma-separated text.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// `BRANCH_AGE_DAYS`
    pub branch_age_days: Option<u32>,
    /// `BRANCH_ALLOW_PATTERNS`
    pub allow_patterns: Option<String>,
    /// `BRANCH_DENY_PATTERNS`
    pub deny_patterns: Option<String>,
    /// `DESK_CHECK_LABEL`
    pub desk_check_label: Option<String>,
    /// `DESK_CHECK_COMMENT_PHRASE`
    pub desk_check_phrase: Option<String>,
    /// `ISSUE_MENTION_USERS`
    pub approvers: Option<String>,
    /// `ISSUE_WAIT_MINUTES`
    pub approval_wait_minutes: Option<u64>,
    /// `DRY_RUN`
    pub dry_run: bool,
}

impl ConfigOverrides {
    /// Layer these overrides on top of `base` and normalize the result.
    pub fn apply(self, base: JanitorConfig) -> JanitorConfig {
        JanitorConfig {
            branch_age_days: self.branch_age_days.unwrap_or(base.branch_age_days),
            allow_patterns: self
                .allow_patterns
                .map_or(base.allow_patterns, |v| parse_csv(&v)),
            deny_patterns: self
                .deny_patterns
                .map_or(base.deny_patterns, |v| parse_csv(&v)),
            desk_check_label: self.desk_check_label.unwrap_or(base.desk_check_label),
            desk_check_phrase: self.desk_check_phrase.unwrap_or(base.desk_check_phrase),
            approvers: self.approvers.map_or(base.approvers, |v| parse_csv(&v)),
            approval_wait_minutes: self
                .approval_wait_minutes
                .unwrap_or(base.approval_wait_minutes),
            dry_run: self.dry_run || base.dry_run,
        }
        .normalized()
    }
}
