//! Agora server binary

use std::sync::Arc;

use agora::config::{AppConfig, StorageBackend};
use agora::server::ServerBuilder;
use agora::storage::{InMemoryStore, SocialStore};
use anyhow::Result;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.logging.filter))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let store = open_store(&config).await?;
    tracing::info!(backend = ?config.storage.backend, "storage ready");

    let bind = config.server.bind.clone();
    ServerBuilder::new()
        .with_config(config)
        .with_store_arc(store)
        .serve(&bind)
        .await
}

async fn open_store(config: &AppConfig) -> Result<Arc<dyn SocialStore>> {
    match config.storage.backend {
        StorageBackend::Memory => Ok(Arc::new(InMemoryStore::new())),
        #[cfg(feature = "postgres")]
        StorageBackend::Postgres => {
            let url = config
                .storage
                .database_url
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("storage.database_url is required for postgres"))?;
            Ok(Arc::new(agora::storage::PostgresStore::connect(url).await?))
        }
        #[cfg(not(feature = "postgres"))]
        StorageBackend::Postgres => {
            anyhow::bail!("this binary was built without the `postgres` feature")
        }
    }
}
