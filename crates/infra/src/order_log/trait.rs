use std::sync::Arc;

use storefront_core::OrderId;
use storefront_inventory::ProductId;
use storefront_sales::Order;

use crate::error::StoreError;

/// Append-only order log keyed by `order_id`.
///
/// Orders are written once and never updated or deleted. Appending an
/// `order_id` that is already present is a `StoreError::Backend`.
#[async_trait::async_trait]
pub trait OrderLog: Send + Sync {
    /// Durably record a new order.
    async fn append(&self, order: &Order) -> Result<(), StoreError>;

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>, StoreError>;

    /// All orders recorded against a product, oldest first.
    async fn list_for_product(&self, product_id: &ProductId) -> Result<Vec<Order>, StoreError>;
}

#[async_trait::async_trait]
impl<L> OrderLog for Arc<L>
where
    L: OrderLog + ?Sized,
{
    async fn append(&self, order: &Order) -> Result<(), StoreError> {
        (**self).append(order).await
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        (**self).get(order_id).await
    }

    async fn list_for_product(&self, product_id: &ProductId) -> Result<Vec<Order>, StoreError> {
        (**self).list_for_product(product_id).await
    }
}
