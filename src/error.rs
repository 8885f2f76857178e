//! Error types for repo-janitor

use thiserror::Error;

/// Errors raised by the janitor library
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration value or file
    #[error("configuration error: {0}")]
    Config(String),

    /// A branch pattern failed to compile
    #[error("invalid branch pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as written in the configuration
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// GitHub REST or GraphQL call failed
    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    /// Generic hosting provider failure
    #[error("platform error: {0}")]
    Platform(String),

    /// No usable credentials
    #[error("authentication error: {0}")]
    Auth(String),

    /// Unexpected internal failure
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error belongs to the configuration family.
    ///
    /// Configuration errors are raised before any mutating call is made.
    pub const fn is_config(&self) -> bool {
        matches!(self, Self::Config(_) | Self::InvalidPattern { .. })
    }
}

impl From<octocrab::Error> for Error {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => {
                Self::GitHubApi(format!("{} ({})", source.message, source.status_code))
            }
            other => Self::GitHubApi(other.to_string()),
        }
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;
