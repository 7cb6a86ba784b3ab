//! Server command - run the API in-process

use std::sync::Arc;

use anyhow::Result;
use crowdfundfix::{seed, Config, Marketplace, Storage};
use tracing::info;

/// Flags given on the command line; unset ones fall back to config.toml and env
#[derive(Debug, Default)]
pub struct ServerOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub seed: bool,
}

impl ServerOverrides {
    pub fn apply(self, config: &mut Config) {
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(database) = self.database {
            config.database.path = database;
        }
        if self.seed {
            config.app.seed_demo_data = true;
        }
    }
}

pub async fn run(overrides: ServerOverrides) -> Result<()> {
    let mut config = Config::load()?;
    overrides.apply(&mut config);

    let storage = Arc::new(Storage::open(&config.database.path)?);
    info!("SQLite storage initialized at {}", config.database.path);
    if config.app.seed_demo_data {
        seed::seed_demo_data(&storage)?;
    }

    let marketplace = Arc::new(Marketplace::new(storage));
    crowdfundfix::server::run_server(
        &config.server.host,
        config.server.port,
        &config.app.name,
        marketplace,
    )
    .await
}
