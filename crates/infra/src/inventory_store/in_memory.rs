use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, RwLock};

use serde_json::{Map, Value as JsonValue};

use storefront_inventory::{stock, Product, ProductId, Quantity};

use super::r#trait::{DecrementOutcome, InventoryStore};
use crate::error::StoreError;

/// One product's mutable stock next to its immutable metadata.
#[derive(Debug)]
struct StockCell {
    quantity: AtomicI64,
    metadata: Map<String, JsonValue>,
}

/// In-memory inventory store.
///
/// Each product's stock lives in its own atomic counter and is only changed
/// through a compare-and-swap loop. The map lock is held just long enough to
/// find the cell, so decrements for different products never contend.
///
/// Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    products: RwLock<HashMap<ProductId, Arc<StockCell>>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with `products` (later duplicates are ignored).
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> Self {
        let mut map = HashMap::new();
        for product in products {
            let (product_id, quantity, metadata) = product.into_parts();
            map.entry(product_id).or_insert_with(|| {
                Arc::new(StockCell {
                    quantity: AtomicI64::new(quantity),
                    metadata,
                })
            });
        }
        Self {
            products: RwLock::new(map),
        }
    }

    fn cell(&self, product_id: &ProductId) -> Result<Option<Arc<StockCell>>, StoreError> {
        let map = self
            .products
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(map.get(product_id).cloned())
    }
}

fn snapshot(product_id: &ProductId, cell: &StockCell) -> Result<Product, StoreError> {
    Product::new(
        product_id.clone(),
        cell.quantity.load(Ordering::Acquire),
        cell.metadata.clone(),
    )
    .map_err(|e| StoreError::backend(e.to_string()))
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        match self.cell(product_id)? {
            Some(cell) => snapshot(product_id, &cell).map(Some),
            None => Ok(None),
        }
    }

    async fn conditional_decrement(
        &self,
        product_id: &ProductId,
        amount: Quantity,
    ) -> Result<DecrementOutcome, StoreError> {
        let Some(cell) = self.cell(product_id)? else {
            return Ok(DecrementOutcome::NotFound);
        };

        // CAS loop: retried only when another writer changed the counter in between.
        let result = cell
            .quantity
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                stock::remaining_after(current, amount)
            });

        Ok(match result {
            Ok(previous) => DecrementOutcome::Applied {
                remaining: Some(previous - amount.get()),
            },
            Err(_) => DecrementOutcome::ConditionFailed,
        })
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let cells: Vec<(ProductId, Arc<StockCell>)> = {
            let map = self
                .products
                .read()
                .map_err(|_| StoreError::backend("lock poisoned"))?;
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
        };

        let mut products = cells
            .iter()
            .map(|(id, cell)| snapshot(id, cell))
            .collect::<Result<Vec<_>, _>>()?;
        products.sort_by(|a, b| a.product_id().cmp(b.product_id()));
        Ok(products)
    }

    async fn insert(&self, product: Product) -> Result<bool, StoreError> {
        let mut map = self
            .products
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let (product_id, quantity, metadata) = product.into_parts();
        if map.contains_key(&product_id) {
            return Ok(false);
        }
        map.insert(
            product_id,
            Arc::new(StockCell {
                quantity: AtomicI64::new(quantity),
                metadata,
            }),
        );
        Ok(true)
    }

    async fn delete(&self, product_id: &ProductId) -> Result<bool, StoreError> {
        let mut map = self
            .products
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(map.remove(product_id).is_some())
    }
}
