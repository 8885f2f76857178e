//! Auth command - verify GitHub credentials

use crate::cli::style::{Stylize, check};
use anstream::println;
use clap::Subcommand;
use repo_janitor::auth::{get_github_auth, test_github_auth};
use repo_janitor::error::Result;

/// Auth subcommands
#[derive(Subcommand, Debug)]
pub enum AuthAction {
    /// Resolve a token and check it against the API
    Test {
        /// GitHub Enterprise host
        #[arg(long, env = "GH_HOST")]
        host: Option<String>,
    },
}

/// Run the auth command
pub async fn run_auth(action: AuthAction) -> Result<()> {
    match action {
        AuthAction::Test { host } => {
            let auth = get_github_auth(host.as_deref()).await?;
            let login = test_github_auth(&auth, host.as_deref()).await?;
            println!(
                "{} Authenticated as {} (token from {})",
                check(),
                login.accent(),
                auth.source.muted()
            );
        }
    }
    Ok(())
}
