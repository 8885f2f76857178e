//! Shared test fixtures

#![allow(dead_code)]

mod mock_platform;

pub use mock_platform::{CreateCommentCall, CreateIssueCall, MockPlatformService};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use repo_janitor::clock::Clock;
use repo_janitor::types::{IssueComment, PlatformConfig, PrState, PullRequest};
use std::sync::Mutex;

/// Fixed "now" used across tests
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
}

/// A timestamp `days` before `test_now()`
pub fn days_ago(days: i64) -> DateTime<Utc> {
    test_now() - Duration::days(days)
}

pub fn github_config() -> PlatformConfig {
    PlatformConfig {
        owner: "test".to_string(),
        repo: "repo".to_string(),
        host: None,
    }
}

pub fn mock_platform() -> MockPlatformService {
    MockPlatformService::with_config(github_config())
}

/// An open, non-draft PR with no labels
pub fn make_pr(number: u64, branch: &str) -> PullRequest {
    PullRequest {
        number,
        state: PrState::Open,
        is_draft: false,
        head_ref: branch.to_string(),
        updated_at: Some(days_ago(1)),
        labels: vec![],
        node_id: Some(format!("PR_node_{number}")),
    }
}

/// A draft PR last updated `updated_days_ago` days ago
pub fn make_draft_pr(number: u64, branch: &str, updated_days_ago: i64) -> PullRequest {
    PullRequest {
        is_draft: true,
        updated_at: Some(days_ago(updated_days_ago)),
        ..make_pr(number, branch)
    }
}

pub fn make_comment(author: &str, body: &str) -> IssueComment {
    IssueComment {
        author: author.to_string(),
        body: body.to_string(),
        created_at: test_now(),
    }
}

/// Clock with virtual time; `sleep` advances it instead of waiting
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<std::time::Duration>>,
}

impl ManualClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn at_test_now() -> Self {
        Self::new(test_now())
    }

    pub fn sleep_count(&self) -> usize {
        self.sleeps.lock().unwrap().len()
    }

    pub fn elapsed_since_test_now(&self) -> Duration {
        *self.now.lock().unwrap() - test_now()
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: std::time::Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let step = Duration::from_std(duration).unwrap();
        *self.now.lock().unwrap() += step;
    }
}
