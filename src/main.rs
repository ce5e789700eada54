mod config;
mod news;
mod open_url;
mod ui;
mod util;

use anyhow::{Context, Result};
use std::{env, io};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so they never interleave with the listing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    // Only positional argument: the endpoint to start on
    let endpoint = env::args()
        .nth(1)
        .unwrap_or_else(|| config::DEFAULT_ENDPOINT.to_string());

    let cfg = config::load()?;
    let source = news::HttpSource::new(&cfg).context("failed to build http client")?;
    let browser = open_url::SystemBrowser::new(cfg.open_command.clone());

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    news::run(&cfg, &source, &browser, &endpoint, stdin.lock(), &mut stdout).await?;

    Ok(())
}
