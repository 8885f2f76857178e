//! Age checks against the configured cutoff

use chrono::{DateTime, Duration, Utc};

/// Outcome of comparing a timestamp to the cutoff
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Staleness {
    /// Older than the cutoff
    Stale,
    /// Within the cutoff
    Fresh,
    /// No timestamp available; never treated as stale
    Unknown,
}

impl Staleness {
    /// Classify `timestamp` relative to `now`.
    ///
    /// Stale iff `now - timestamp` is strictly greater than `cutoff`.
    pub fn classify(
        timestamp: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        cutoff: Duration,
    ) -> Self {
        match timestamp {
            Some(ts) if now.signed_duration_since(ts) > cutoff => Self::Stale,
            Some(_) => Self::Fresh,
            None => Self::Unknown,
        }
    }

    /// Whether this outcome is `Stale`
    pub const fn is_stale(self) -> bool {
        matches!(self, Self::Stale)
    }
}
