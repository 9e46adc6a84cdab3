use std::sync::Arc;

use thiserror::Error;

use storefront_infra::catalog_seed::{self, CatalogSeedError};
use storefront_infra::config::{AppConfig, StorageBackend};
use storefront_infra::db;
use storefront_infra::inventory_store::{
    InMemoryInventoryStore, InventoryStore, PostgresInventoryStore,
};
use storefront_infra::order_log::{InMemoryOrderLog, OrderLog, PostgresOrderLog};
use storefront_infra::{OrderProcessor, StoreError};

pub type SharedInventory = Arc<dyn InventoryStore>;
pub type SharedOrderLog = Arc<dyn OrderLog>;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error("database setup failed: {0}")]
    Database(#[from] StoreError),

    #[error(transparent)]
    Seed(#[from] CatalogSeedError),
}

/// Everything the handlers need, shared behind an `Arc` extension.
pub struct AppServices {
    processor: OrderProcessor<SharedInventory, SharedOrderLog>,
}

impl AppServices {
    pub fn new(inventory: SharedInventory, orders: SharedOrderLog) -> Self {
        Self {
            processor: OrderProcessor::new(inventory, orders),
        }
    }

    /// Empty in-memory stores (dev/test).
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryInventoryStore::new()),
            Arc::new(InMemoryOrderLog::new()),
        )
    }

    pub fn processor(&self) -> &OrderProcessor<SharedInventory, SharedOrderLog> {
        &self.processor
    }

    pub fn inventory(&self) -> &SharedInventory {
        self.processor.inventory()
    }

    pub fn orders(&self) -> &SharedOrderLog {
        self.processor.orders()
    }
}

/// Wire the configured backends and load the catalog seed, if any.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, ServicesError> {
    let services = match &config.storage {
        StorageBackend::InMemory => {
            tracing::info!("using in-memory stores");
            AppServices::in_memory()
        }
        StorageBackend::Postgres {
            database_url,
            max_connections,
        } => build_persistent_services(database_url, *max_connections).await?,
    };

    if let Some(path) = &config.catalog_seed {
        let products = catalog_seed::read_catalog(path)?;
        tracing::info!(path = %path.display(), products = products.len(), "loading catalog seed");
        catalog_seed::seed_catalog(services.inventory(), products).await?;
    }

    Ok(services)
}

async fn build_persistent_services(
    database_url: &str,
    max_connections: u32,
) -> Result<AppServices, ServicesError> {
    let pool = db::connect(database_url, max_connections).await?;
    db::ensure_schema(&pool).await?;
    tracing::info!(max_connections, "using postgres stores");

    Ok(AppServices::new(
        Arc::new(PostgresInventoryStore::new(pool.clone())),
        Arc::new(PostgresOrderLog::new(pool)),
    ))
}
