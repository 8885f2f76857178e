//! repo-janitor: stale branch and pull request hygiene for GitHub
//!
//! Deletes stale branches without open PRs, escalates branches outside the
//! allow patterns to an issue-comment vote, and moves open PRs lacking a
//! desk check to draft before closing them once they go stale.

pub mod auth;
pub mod clock;
pub mod config;
pub mod error;
pub mod janitor;
pub mod platform;
pub mod types;
