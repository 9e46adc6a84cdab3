//! Order fulfillment pipeline (application-level orchestration).
//!
//! ```text
//! PlaceOrder(product_id, quantity)
//!   ↓
//! 1. Validate input (no store access)
//!   ↓
//! 2. Read product                        → ProductNotFound
//!   ↓
//! 3. Advisory stock pre-check            → InsufficientStock
//!   ↓
//! 4. Conditional decrement (atomic)      → InsufficientStock / ProductNotFound
//!                                          / DecrementUnconfirmed
//!   ↓
//! 5. Append order to the order log       → PartialFailure
//!   ↓
//! Order
//! ```
//!
//! The processor holds no mutable state and takes no locks. Correctness under
//! concurrent orders comes entirely from the store's conditional decrement:
//! step 3 only saves a write when the answer is already known, and a request
//! that passes it can still lose the race at step 4. That is an ordinary
//! `InsufficientStock`, not an error.
//!
//! Nothing is retried here. Business rejections are final. Only a store fault
//! in step 2 is reported as retryable: from step 4 on, a fault may hide a
//! decrement that already happened, and retrying would take the stock twice.

use chrono::Utc;
use thiserror::Error;

use storefront_core::OrderId;
use storefront_inventory::{stock, ProductId, Quantity};
use storefront_sales::{Order, PlaceOrder};

use crate::error::StoreError;
use crate::inventory_store::{DecrementOutcome, InventoryStore};
use crate::order_log::OrderLog;

/// Why an order was not placed.
#[derive(Debug, Error)]
pub enum PlaceOrderError {
    /// Malformed request. No store was contacted.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The product does not exist (or was deleted before stock could be taken).
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// Stock does not cover the request. `available` is the stock level seen by
    /// the pre-check, or `None` when the conditional decrement itself refused.
    #[error("insufficient stock for {product_id}: requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        requested: Quantity,
        available: Option<i64>,
    },

    /// Stock was taken but the order could not be recorded. Needs reconciliation:
    /// `quantity` units of `product_id` are gone with no order `order_id` on file.
    #[error(
        "order {order_id} not recorded after taking {quantity} units of {product_id}: {source}"
    )]
    PartialFailure {
        order_id: OrderId,
        product_id: ProductId,
        quantity: Quantity,
        source: StoreError,
    },

    /// The conditional decrement failed with a store fault, so whether the
    /// stock was taken is unknown. Needs reconciliation, never a blind retry.
    #[error("decrement of {quantity} units of {product_id} unconfirmed: {source}")]
    DecrementUnconfirmed {
        product_id: ProductId,
        quantity: Quantity,
        source: StoreError,
    },

    /// The store failed before any stock was taken.
    #[error("store unavailable: {0}")]
    StoreUnavailable(#[source] StoreError),
}

impl PlaceOrderError {
    /// Whether retrying the same `place_order` call is safe and may succeed.
    ///
    /// Only a transient fault before the decrement qualifies.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PlaceOrderError::StoreUnavailable(StoreError::Unavailable(_)))
    }
}

/// Runs the check-decrement-record sequence against an inventory store and an order log.
///
/// - `S`: inventory store (owns product stock)
/// - `L`: order log (owns order records)
#[derive(Debug)]
pub struct OrderProcessor<S, L> {
    inventory: S,
    orders: L,
}

impl<S, L> OrderProcessor<S, L> {
    pub fn new(inventory: S, orders: L) -> Self {
        Self { inventory, orders }
    }

    pub fn inventory(&self) -> &S {
        &self.inventory
    }

    pub fn orders(&self) -> &L {
        &self.orders
    }

    pub fn into_parts(self) -> (S, L) {
        (self.inventory, self.orders)
    }
}

impl<S, L> OrderProcessor<S, L>
where
    S: InventoryStore,
    L: OrderLog,
{
    /// Place an order for `quantity` units of `product_id`.
    ///
    /// Returns the recorded order, or the typed reason it was not placed.
    pub async fn place_order(
        &self,
        product_id: &str,
        quantity: i64,
    ) -> Result<Order, PlaceOrderError> {
        // 1) Validate
        let request = PlaceOrder::new(product_id, quantity)
            .map_err(|e| PlaceOrderError::InvalidInput(e.to_string()))?;
        let product_id = request.product_id.clone();
        let requested = request.quantity;

        // 2) Read
        let product = self
            .inventory
            .get(&product_id)
            .await
            .map_err(PlaceOrderError::StoreUnavailable)?
            .ok_or_else(|| {
                tracing::warn!(
                    %product_id,
                    quantity = requested.get(),
                    "order rejected: product not found"
                );
                PlaceOrderError::ProductNotFound(product_id.clone())
            })?;

        // 3) Advisory pre-check (may be stale)
        if !stock::covers(product.quantity(), requested) {
            tracing::warn!(
                %product_id,
                quantity = requested.get(),
                available = product.quantity(),
                "order rejected: insufficient stock"
            );
            return Err(PlaceOrderError::InsufficientStock {
                product_id,
                requested,
                available: Some(product.quantity()),
            });
        }

        // 4) Take stock
        let outcome = match self
            .inventory
            .conditional_decrement(&product_id, requested)
            .await
        {
            Ok(outcome) => outcome,
            Err(source) => {
                tracing::error!(
                    %product_id,
                    quantity = requested.get(),
                    error = %source,
                    "decrement outcome unknown; reconciliation required"
                );
                return Err(PlaceOrderError::DecrementUnconfirmed {
                    product_id,
                    quantity: requested,
                    source,
                });
            }
        };
        let remaining = match outcome {
            DecrementOutcome::Applied { remaining } => remaining,
            DecrementOutcome::ConditionFailed => {
                tracing::warn!(
                    %product_id,
                    quantity = requested.get(),
                    "order rejected: stock taken by a concurrent order"
                );
                return Err(PlaceOrderError::InsufficientStock {
                    product_id,
                    requested,
                    available: None,
                });
            }
            DecrementOutcome::NotFound => {
                tracing::warn!(
                    %product_id,
                    quantity = requested.get(),
                    "order rejected: product removed before stock was taken"
                );
                return Err(PlaceOrderError::ProductNotFound(product_id));
            }
        };

        // 5) Record
        let order = Order::fulfil(request, Utc::now());
        if let Err(source) = self.orders.append(&order).await {
            tracing::error!(
                order_id = %order.order_id(),
                %product_id,
                quantity = requested.get(),
                error = %source,
                "stock decremented but order not recorded; reconciliation required"
            );
            return Err(PlaceOrderError::PartialFailure {
                order_id: order.order_id(),
                product_id,
                quantity: requested,
                source,
            });
        }

        tracing::info!(
            order_id = %order.order_id(),
            %product_id,
            quantity = requested.get(),
            remaining = ?remaining,
            "order placed"
        );
        Ok(order)
    }
}
