//! GitHub token resolution

use super::AuthSource;
use crate::error::{Error, Result};
use crate::platform::GitHubService;
use std::env;
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// Personal access or workflow token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Resolve a GitHub token.
///
/// Checks `GITHUB_TOKEN`, then `GH_TOKEN`, then falls back to
/// `gh auth token` (optionally for a GitHub Enterprise host).
pub async fn get_github_auth(host: Option<&str>) -> Result<GitHubAuthConfig> {
    for var in TOKEN_VARS {
        if let Ok(token) = env::var(var) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                debug!(var, "using token from environment");
                return Ok(GitHubAuthConfig {
                    token,
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    let mut cmd = Command::new("gh");
    cmd.args(["auth", "token"]);
    if let Some(h) = host {
        cmd.args(["--hostname", h]);
    }

    let output = cmd.output().await.map_err(|e| {
        Error::Auth(format!(
            "no GITHUB_TOKEN/GH_TOKEN set and gh CLI unavailable: {e}"
        ))
    })?;

    if !output.status.success() {
        return Err(Error::Auth(
            "no GITHUB_TOKEN/GH_TOKEN set and `gh auth token` failed; run `gh auth login`"
                .to_string(),
        ));
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if token.is_empty() {
        return Err(Error::Auth("`gh auth token` returned no token".to_string()));
    }

    debug!("using token from gh CLI");
    Ok(GitHubAuthConfig {
        token,
        source: AuthSource::Cli,
    })
}

/// Verify a token by fetching the authenticated user's login.
pub async fn test_github_auth(config: &GitHubAuthConfig, host: Option<&str>) -> Result<String> {
    // Owner and repo are irrelevant for the user endpoint
    let service = GitHubService::new(
        &config.token,
        String::new(),
        String::new(),
        host.map(ToString::to_string),
    )?;
    service.current_user().await
}
