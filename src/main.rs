use anyhow::{Context, Result};
use refdata_sync::config::Config;
use refdata_sync::pipeline::{self, Target};
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    // Load .env file (ignored in CI)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("refdata_sync=info".parse()?),
        )
        .init();

    let target = match std::env::args().nth(1) {
        Some(arg) => arg.parse::<Target>()?,
        None => Target::All,
    };

    info!("Starting reference data sync ({})", target);

    let config = Config::from_env()?;
    let fetcher = pipeline::build_fetcher(&config).context("Failed to build HTTP client")?;

    let signal = pipeline::run(&config, &fetcher, target).await;

    if signal.is_success() {
        info!("Finished {} sync", target);
    } else {
        error!("{} sync failed with exit code {}", target, signal.code());
    }
    Ok(signal.into())
}
