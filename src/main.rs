//! CrowdfundFix Server
//!
//! Serves the bug marketplace API

use std::sync::Arc;

use crowdfundfix::{Config, Marketplace, Storage};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::load()?;
    info!("Starting {}", config.app.name);

    let storage = Arc::new(Storage::open(&config.database.path)?);
    info!("SQLite storage initialized at {}", config.database.path);

    if config.app.seed_demo_data {
        crowdfundfix::seed::seed_demo_data(&storage)?;
    }

    let marketplace = Arc::new(Marketplace::new(storage));

    crowdfundfix::server::run_server(
        &config.server.host,
        config.server.port,
        &config.app.name,
        marketplace,
    )
    .await?;

    Ok(())
}
