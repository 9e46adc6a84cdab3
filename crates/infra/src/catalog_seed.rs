//! Startup catalog loading.
//!
//! A seed file is a JSON array of products in their wire shape:
//!
//! ```json
//! [{ "product_id": "svc-s3", "quantity": 10, "title": "Amazon S3", "price": 9.99 }]
//! ```
//!
//! Seeding only inserts products that are absent, so restarting the service
//! against a persistent store never resets stock that orders already consumed.

use std::path::{Path, PathBuf};

use thiserror::Error;

use storefront_inventory::Product;

use crate::error::StoreError;
use crate::inventory_store::InventoryStore;

#[derive(Debug, Error)]
pub enum CatalogSeedError {
    #[error("failed to read catalog seed {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog seed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("failed to seed catalog: {0}")]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

pub fn parse_catalog(json: &str) -> Result<Vec<Product>, CatalogSeedError> {
    Ok(serde_json::from_str(json)?)
}

pub fn read_catalog(path: &Path) -> Result<Vec<Product>, CatalogSeedError> {
    let json = std::fs::read_to_string(path).map_err(|source| CatalogSeedError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_catalog(&json)
}

/// Insert every product not already in `store`.
pub async fn seed_catalog<S>(
    store: &S,
    products: Vec<Product>,
) -> Result<SeedReport, CatalogSeedError>
where
    S: InventoryStore + ?Sized,
{
    let mut report = SeedReport::default();
    for product in products {
        let product_id = product.product_id().clone();
        if store.insert(product).await? {
            report.inserted += 1;
        } else {
            tracing::debug!(%product_id, "catalog seed skipped existing product");
            report.skipped += 1;
        }
    }
    tracing::info!(inserted = report.inserted, skipped = report.skipped, "catalog seeded");
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory_store::InMemoryInventoryStore;
    use storefront_inventory::{ProductId, Quantity};

    const SEED: &str = r#"[
        {"product_id": "svc-lambda", "quantity": 5, "title": "AWS Lambda", "price": 0.2},
        {"product_id": "svc-s3", "quantity": 10, "tag": "storage"}
    ]"#;

    #[test]
    fn parses_products_with_metadata() {
        let products = parse_catalog(SEED).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].product_id().as_str(), "svc-lambda");
        assert_eq!(products[0].quantity(), 5);
        assert_eq!(products[0].metadata()["title"], "AWS Lambda");
    }

    #[test]
    fn rejects_negative_stock_and_bad_json() {
        assert!(matches!(
            parse_catalog(r#"[{"product_id": "p1", "quantity": -1}]"#),
            Err(CatalogSeedError::Parse(_))
        ));
        assert!(matches!(parse_catalog("{"), Err(CatalogSeedError::Parse(_))));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read_catalog(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CatalogSeedError::Read { .. }));
    }

    #[tokio::test]
    async fn reseeding_never_restores_consumed_stock() {
        let store = InMemoryInventoryStore::new();
        let report = seed_catalog(&store, parse_catalog(SEED).unwrap()).await.unwrap();
        assert_eq!(report, SeedReport { inserted: 2, skipped: 0 });

        let id = ProductId::new("svc-lambda").unwrap();
        store
            .conditional_decrement(&id, Quantity::new(4).unwrap())
            .await
            .unwrap();

        let report = seed_catalog(&store, parse_catalog(SEED).unwrap()).await.unwrap();
        assert_eq!(report, SeedReport { inserted: 0, skipped: 2 });
        assert_eq!(store.get(&id).await.unwrap().unwrap().quantity(), 1);
    }
}
