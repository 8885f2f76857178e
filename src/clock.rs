//! Time source for staleness checks and approval polling

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Wall clock plus a way to wait on it.
///
/// The approval workflow blocks on `sleep` between polls; tests swap in a
/// clock whose `sleep` advances virtual time instead of waiting.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current time
    fn now(&self) -> DateTime<Utc>;

    /// Suspend the calling flow for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by `Utc::now` and `tokio::time::sleep`
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
