//! Shared command context for CLI commands

use repo_janitor::auth::{AuthSource, get_github_auth};
use repo_janitor::config::parse_repo_slug;
use repo_janitor::error::Result;
use repo_janitor::platform::{GitHubService, PlatformService};
use tracing::debug;

/// Shared context for commands that talk to GitHub
///
/// Resolves credentials, parses the repository slug and builds the
/// platform service.
pub struct CommandContext {
    /// Platform service (GitHub)
    pub platform: Box<dyn PlatformService>,
    /// Where the token came from
    pub auth_source: AuthSource,
}

impl CommandContext {
    /// Create a new command context for `owner/name` on an optional host
    pub async fn new(repo: &str, host: Option<&str>) -> Result<Self> {
        let (owner, name) = parse_repo_slug(repo)?;
        let auth = get_github_auth(host).await?;
        debug!(source = %auth.source, "resolved GitHub token");

        let platform = GitHubService::new(&auth.token, owner, name, host.map(ToString::to_string))?;

        Ok(Self {
            platform: Box::new(platform),
            auth_source: auth.source,
        })
    }
}
