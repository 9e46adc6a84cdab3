use std::sync::Arc;

use storefront_inventory::{Product, ProductId, Quantity};

use crate::error::StoreError;

/// Result of a conditional decrement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DecrementOutcome {
    /// Stock covered the amount and was decremented. `remaining` is the stock
    /// level right after this decrement, or `None` if the backend applied the
    /// write but could not report it.
    Applied { remaining: Option<i64> },
    /// Stock did not cover the amount at the instant of application. Nothing changed.
    ConditionFailed,
    /// No product under that key. Nothing changed.
    NotFound,
}

/// Key-value store of catalog products with an atomic conditional decrement.
///
/// ## Conditional decrement
///
/// `conditional_decrement` is the only way product stock changes. It must be
/// atomic with respect to every concurrent caller for the same `product_id`:
/// it succeeds only if `quantity >= amount` at the instant of application and
/// then applies `quantity -= amount` indivisibly. Two callers racing for the
/// last unit can never both see `Applied`, and no reader can ever observe a
/// negative quantity.
///
/// Implementations must use a compare-and-set (or an equivalent conditional
/// write in the backend), never a read followed by an unconditional write.
///
/// ## Contention
///
/// Decrements for different `product_id`s must not serialize on each other.
///
/// ## Errors
///
/// `StoreError` is reserved for infrastructure faults. Missing products and
/// insufficient stock are ordinary return values.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    /// Current record for a product, or `None` if it does not exist.
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError>;

    /// Atomically take `amount` units if (and only if) stock covers them.
    async fn conditional_decrement(
        &self,
        product_id: &ProductId,
        amount: Quantity,
    ) -> Result<DecrementOutcome, StoreError>;

    /// Every product in the catalog (full scan, unpaginated).
    async fn list(&self) -> Result<Vec<Product>, StoreError>;

    /// Add a product unless one with the same id already exists.
    ///
    /// Returns `true` if the product was inserted. Existing records (and their
    /// stock) are never overwritten.
    async fn insert(&self, product: Product) -> Result<bool, StoreError>;

    /// Remove a product. Returns `true` if it existed.
    ///
    /// Orders referencing the product are unaffected.
    async fn delete(&self, product_id: &ProductId) -> Result<bool, StoreError>;
}

#[async_trait::async_trait]
impl<S> InventoryStore for Arc<S>
where
    S: InventoryStore + ?Sized,
{
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        (**self).get(product_id).await
    }

    async fn conditional_decrement(
        &self,
        product_id: &ProductId,
        amount: Quantity,
    ) -> Result<DecrementOutcome, StoreError> {
        (**self).conditional_decrement(product_id, amount).await
    }

    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        (**self).list().await
    }

    async fn insert(&self, product: Product) -> Result<bool, StoreError> {
        (**self).insert(product).await
    }

    async fn delete(&self, product_id: &ProductId) -> Result<bool, StoreError> {
        (**self).delete(product_id).await
    }
}
