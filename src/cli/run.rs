//! Run command - one reconciliation pass over the repository

use crate::cli::context::CommandContext;
use crate::cli::style::{CHECK, Stylize, arrow};
use anstream::println;
use clap::Args;
use clap::builder::BoolishValueParser;
use repo_janitor::clock::SystemClock;
use repo_janitor::config::{ConfigOverrides, load_config};
use repo_janitor::error::{Error, Result};
use repo_janitor::janitor::{ApprovalOutcome, BranchReconciler, ReconcileReport, Summary};
use std::path::PathBuf;
use tracing::info;

/// Options for the run command
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Repository as owner/name
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: String,

    /// GitHub Enterprise host
    #[arg(long, env = "GH_HOST")]
    pub host: Option<String>,

    /// TOML configuration file
    #[arg(long, env = "JANITOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Days after which a branch or draft PR is stale
    #[arg(long, env = "BRANCH_AGE_DAYS")]
    pub branch_age_days: Option<u32>,

    /// Comma-separated regexes; stale branches matching none need approval
    #[arg(long, env = "BRANCH_ALLOW_PATTERNS")]
    pub allow_patterns: Option<String>,

    /// Comma-separated regexes; matching branches are never touched
    #[arg(long, env = "BRANCH_DENY_PATTERNS")]
    pub deny_patterns: Option<String>,

    /// Label that marks a PR as desk-checked
    #[arg(long, env = "DESK_CHECK_LABEL")]
    pub desk_check_label: Option<String>,

    /// Comment phrase that marks a PR as desk-checked
    #[arg(long, env = "DESK_CHECK_COMMENT_PHRASE")]
    pub desk_check_phrase: Option<String>,

    /// Comma-separated users who may vote on approval issues
    #[arg(long, env = "ISSUE_MENTION_USERS")]
    pub approvers: Option<String>,

    /// Minutes to wait for an approval vote
    #[arg(long, env = "ISSUE_WAIT_MINUTES")]
    pub approval_wait_minutes: Option<u64>,

    /// Log intended changes without making them
    #[arg(long, env = "DRY_RUN", value_parser = BoolishValueParser::new())]
    pub dry_run: bool,

    /// Print the summary as JSON
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            branch_age_days: self.branch_age_days,
            allow_patterns: self.allow_patterns.clone(),
            deny_patterns: self.deny_patterns.clone(),
            desk_check_label: self.desk_check_label.clone(),
            desk_check_phrase: self.desk_check_phrase.clone(),
            approvers: self.approvers.clone(),
            approval_wait_minutes: self.approval_wait_minutes,
            dry_run: self.dry_run,
        }
    }
}

/// Run the janitor once
pub async fn run_janitor(args: RunArgs) -> Result<()> {
    let config = args.overrides().apply(load_config(args.config.as_deref())?);
    config.validate()?;

    let ctx = CommandContext::new(&args.repo, args.host.as_deref()).await?;
    info!(auth = %ctx.auth_source, "starting janitor run");

    let clock = SystemClock;
    let reconciler = BranchReconciler::new(ctx.platform.as_ref(), &clock, &config)?;
    let report = reconciler.run().await?;

    if args.json {
        let json = serde_json::to_string_pretty(&report.summary)
            .map_err(|e| Error::Internal(format!("failed to serialize summary: {e}")))?;
        println!("{json}");
    } else {
        print_report(&args.repo, &report);
    }

    Ok(())
}

fn print_report(repo: &str, report: &ReconcileReport) {
    let summary = &report.summary;

    println!();
    if summary.dry_run {
        println!("{} {}", "Dry run complete:".muted(), repo.accent());
    } else {
        println!("{} {}", format!("{CHECK} Janitor complete:").success(), repo.accent());
    }

    print_counts(summary);

    match report.approval {
        Some(ApprovalOutcome::Completed(ref approval)) => {
            let decision = approval
                .decision
                .map_or_else(|| "no response".to_string(), |d| d.to_string());
            println!(
                "  {} approval issue #{} ({}): {}",
                arrow(),
                approval.issue_number,
                approval.issue_url.muted(),
                decision.emphasis()
            );
        }
        Some(ApprovalOutcome::DryRun { ref branches }) => {
            println!(
                "  {} would request approval for: {}",
                arrow(),
                branches.join(", ").accent()
            );
        }
        None => {}
    }

    if summary.errors > 0 {
        println!(
            "  {}",
            format!("{} item(s) failed, see log for details", summary.errors).warn()
        );
    }
}

fn print_counts(summary: &Summary) {
    let rows = [
        ("branches scanned", summary.scanned),
        ("stale", summary.stale),
        ("unknown age", summary.unknown_age),
        ("deleted", summary.deleted),
        ("pending approval", summary.pending_approval),
        ("PRs drafted", summary.prs_drafted),
        ("PRs closed", summary.prs_closed),
    ];
    for (label, count) in rows {
        println!("  {:<18} {}", label, count.accent());
    }
}
