//! janitor - stale branch and pull request hygiene for GitHub

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use cli::auth::AuthAction;
use cli::run::RunArgs;
use tracing_subscriber::EnvFilter;

/// Stale branch and pull request janitor for GitHub repositories
#[derive(Parser, Debug)]
#[command(name = "janitor")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reconcile branches and pull requests once
    Run(Box<RunArgs>),
    /// Check GitHub credentials
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = if verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Run(args) => cli::run::run_janitor(*args).await?,
        Commands::Auth { action } => cli::auth::run_auth(action).await?,
    }

    Ok(())
}
