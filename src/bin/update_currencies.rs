//! Update the currency list from the country and ISO 4217 sources.

use anyhow::{Context, Result};
use refdata_sync::config::Config;
use refdata_sync::pipeline;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("refdata_sync=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    let fetcher = pipeline::build_fetcher(&config).context("Failed to build HTTP client")?;

    Ok(pipeline::run_currency_sync(&config, &fetcher).await.into())
}
