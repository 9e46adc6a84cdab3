use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, DomainResult, OrderId};
use storefront_inventory::{ProductId, Quantity};

/// A validated request to buy `quantity` units of `product_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

impl PlaceOrder {
    /// Validate raw request input.
    ///
    /// The product id must be non-empty and the quantity strictly positive.
    pub fn new(product_id: &str, quantity: i64) -> DomainResult<Self> {
        let product_id = ProductId::new(product_id)
            .map_err(|_| DomainError::validation("product_id must be a non-empty string"))?;
        let quantity = Quantity::new(quantity)?;
        Ok(Self {
            product_id,
            quantity,
        })
    }
}

/// Immutable record of a fulfilled order.
///
/// Created exactly once, after stock has been taken. `product_id` is a plain
/// reference: the product may be removed from the catalog later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    order_id: OrderId,
    product_id: ProductId,
    quantity: Quantity,
    created_at: DateTime<Utc>,
}

impl Order {
    /// Record a fulfilled request under a freshly generated id.
    pub fn fulfil(request: PlaceOrder, created_at: DateTime<Utc>) -> Self {
        Self::from_parts(OrderId::new(), request.product_id, request.quantity, created_at)
    }

    /// Rebuild a previously persisted order.
    pub fn from_parts(
        order_id: OrderId,
        product_id: ProductId,
        quantity: Quantity,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            order_id,
            product_id,
            quantity,
            created_at,
        }
    }

    pub fn order_id(&self) -> OrderId {
        self.order_id
    }

    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
