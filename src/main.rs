use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod config;
use config::TriageConfig;

mod tracker;
use tracker::GitHubTracker;

mod triage;

mod webhooks;
use webhooks::{build_rocket, GitHubSecret};

#[cfg(test)]
mod test_utils;

#[derive(Parser)]
#[command(version)]
struct Opts {
    /// Configuration file for the triage bot
    #[arg(short, long)]
    config: PathBuf,
}

#[rocket::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let opts = Opts::parse();
    let config = TriageConfig::load(&opts.config).context("failed to load configuration")?;

    let tracker = GitHubTracker::new(&config).context("failed to create GitHub client")?;
    let secret = GitHubSecret(config.github_secret);

    let rocket = build_rocket(secret, Arc::new(tracker));
    rocket.launch().await.map_err(|err| anyhow::anyhow!(err))?;
    Ok(())
}
