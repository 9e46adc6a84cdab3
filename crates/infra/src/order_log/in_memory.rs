use std::collections::HashMap;
use std::sync::RwLock;

use storefront_core::OrderId;
use storefront_inventory::ProductId;
use storefront_sales::Order;

use super::r#trait::OrderLog;
use crate::error::StoreError;

/// In-memory order log.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryOrderLog {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.orders.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait::async_trait]
impl OrderLog for InMemoryOrderLog {
    async fn append(&self, order: &Order) -> Result<(), StoreError> {
        let mut orders = self
            .orders
            .write()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        if orders.contains_key(&order.order_id()) {
            return Err(StoreError::backend(format!(
                "duplicate key: order {} already recorded",
                order.order_id()
            )));
        }
        orders.insert(order.order_id(), order.clone());
        Ok(())
    }

    async fn get(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;
        Ok(orders.get(&order_id).cloned())
    }

    async fn list_for_product(&self, product_id: &ProductId) -> Result<Vec<Order>, StoreError> {
        let orders = self
            .orders
            .read()
            .map_err(|_| StoreError::backend("lock poisoned"))?;

        let mut matching: Vec<Order> = orders
            .values()
            .filter(|o| o.product_id() == product_id)
            .cloned()
            .collect();
        matching.sort_by_key(|o| (o.created_at(), o.order_id()));
        Ok(matching)
    }
}
