//! Workbench: runs the worker pool and the entity service end to end.

use tracing_subscriber::EnvFilter;

mod config;
mod scenarios;

use config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env()?;
    tracing::info!(?config, "Starting workbench");

    scenarios::run_pool(&config).await?;
    scenarios::run_service(&config).await?;

    tracing::info!("Workbench finished");
    Ok(())
}
