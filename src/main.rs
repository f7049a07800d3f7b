mod config;
mod display;
mod fetch;
mod github;

use clap::Parser;
use colored::Colorize;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use fetch::AggregateError;
use github::{GithubClient, GithubError};

/// commit-viewer — CLI tool that lists a repository's most recent GitHub
/// commits and shows the latest one's per-file diff with colorized output.
#[derive(Parser, Debug)]
#[command(name = "commit-viewer", version, about)]
struct Cli {
    /// Owner of the GitHub repository (user or organization)
    #[arg(long)]
    owner: String,

    /// Name of the GitHub repository
    #[arg(long)]
    repo: String,

    /// Branch to fetch commits from
    #[arg(long, default_value = "main")]
    branch: String,

    /// Number of recent commits to fetch (GitHub caps a page at 100)
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u32).range(1..=100))]
    limit: u32,
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),

    #[error(transparent)]
    Github(#[from] GithubError),

    #[error(transparent)]
    Aggregate(#[from] AggregateError),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(&cli).await {
        report_failure(&err);
        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<(), AppError> {
    info!("loading configuration");
    let config = config::Config::load()?;
    let token = config.github_token();
    debug!(authenticated = token.is_some(), "resolved credentials");

    let client = GithubClient::new(&cli.owner, &cli.repo, &cli.branch, token.as_deref())?;

    info!(limit = cli.limit, "fetching recent commits");
    let commits = client.list_commits(cli.limit).await?;
    if commits.is_empty() {
        println!("No commits found on branch '{}'.", cli.branch);
        return Ok(());
    }

    info!(commits = commits.len(), "fetching file changes for each commit");
    let all_changes = fetch::changes_per_commit(&client, &commits).await?;

    display::print_commit(&commits[0], &all_changes[0]);
    Ok(())
}

/// Print a human-readable failure summary to stdout. Aggregated failures
/// list the count and every underlying error; anything else is one line.
fn report_failure(err: &AppError) {
    match err {
        AppError::Aggregate(aggregate) => {
            println!(
                "{} {} error(s) occurred while fetching commit data:",
                "✗".red(),
                aggregate.errors.len()
            );
            for cause in &aggregate.errors {
                println!("  {cause}");
            }
        }
        other => println!("{} {other}", "✗".red()),
    }
}
