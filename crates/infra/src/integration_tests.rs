//! Integration tests for the order pipeline under concurrency.
//!
//! Tests: OrderProcessor → InventoryStore → OrderLog
//!
//! Verifies:
//! - Stock never goes negative however many orders race
//! - Sum of placed quantities never exceeds the initial stock
//! - Exactly one of two racing orders gets the last unit
//! - Orders for different products do not interfere

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use proptest::prelude::*;
    use serde_json::Map;

    use storefront_inventory::{Product, ProductId};

    use crate::inventory_store::{InMemoryInventoryStore, InventoryStore};
    use crate::order_log::{InMemoryOrderLog, OrderLog};
    use crate::order_processor::{OrderProcessor, PlaceOrderError};

    type Processor = OrderProcessor<Arc<InMemoryInventoryStore>, Arc<InMemoryOrderLog>>;

    fn pid(id: &str) -> ProductId {
        ProductId::new(id).unwrap()
    }

    fn setup(stock: &[(&str, i64)]) -> Arc<Processor> {
        let products = stock
            .iter()
            .map(|(id, qty)| Product::new(pid(id), *qty, Map::new()).unwrap());
        Arc::new(OrderProcessor::new(
            Arc::new(InMemoryInventoryStore::with_products(products)),
            Arc::new(InMemoryOrderLog::new()),
        ))
    }

    async fn stock_of(processor: &Processor, id: &str) -> i64 {
        processor
            .inventory()
            .get(&pid(id))
            .await
            .unwrap()
            .unwrap()
            .quantity()
    }

    /// Fire every `(product, quantity)` request on its own task; return the results in order.
    async fn race(
        processor: &Arc<Processor>,
        requests: Vec<(String, i64)>,
    ) -> Vec<Result<storefront_sales::Order, PlaceOrderError>> {
        let handles: Vec<_> = requests
            .into_iter()
            .map(|(product_id, quantity)| {
                let processor = processor.clone();
                tokio::spawn(async move { processor.place_order(&product_id, quantity).await })
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.unwrap());
        }
        results
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn fifty_orders_for_ten_units_sell_exactly_ten() {
        let processor = setup(&[("p1", 10)]);

        let results = race(&processor, vec![("p1".to_string(), 1); 50]).await;

        let placed = results.iter().filter(|r| r.is_ok()).count();
        let rejected = results
            .iter()
            .filter(|r| matches!(r, Err(PlaceOrderError::InsufficientStock { .. })))
            .count();
        assert_eq!(placed, 10);
        assert_eq!(rejected, 40);
        assert_eq!(stock_of(&processor, "p1").await, 0);
        assert_eq!(processor.orders().len(), 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn two_orders_for_the_last_unit_one_wins() {
        for _ in 0..100 {
            let processor = setup(&[("p1", 1)]);

            let results = race(&processor, vec![("p1".to_string(), 1); 2]).await;

            let placed = results.iter().filter(|r| r.is_ok()).count();
            assert_eq!(placed, 1);
            assert!(results.iter().any(|r| matches!(
                r,
                Err(PlaceOrderError::InsufficientStock { .. })
            )));
            assert_eq!(stock_of(&processor, "p1").await, 0);
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn products_are_independent() {
        let processor = setup(&[("a", 20), ("b", 20)]);

        let mut requests = vec![("a".to_string(), 2); 10];
        requests.extend(vec![("b".to_string(), 1); 15]);
        let results = race(&processor, requests).await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(stock_of(&processor, "a").await, 0);
        assert_eq!(stock_of(&processor, "b").await, 5);

        let a_orders = processor.orders().list_for_product(&pid("a")).await.unwrap();
        let b_orders = processor.orders().list_for_product(&pid("b")).await.unwrap();
        assert_eq!(a_orders.len(), 10);
        assert_eq!(b_orders.len(), 15);
    }

    proptest! {
        #![proptest_config(ProptestConfig { cases: 256, .. ProptestConfig::default() })]

        #[test]
        fn concurrent_orders_conserve_stock(
            initial in 0i64..40,
            quantities in proptest::collection::vec(1i64..6, 1..30),
        ) {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(4)
                .enable_all()
                .build()
                .unwrap();

            rt.block_on(async {
                let processor = setup(&[("p1", initial)]);
                let requests = quantities.iter().map(|q| ("p1".to_string(), *q)).collect();
                let results = race(&processor, requests).await;

                let placed: i64 = results
                    .iter()
                    .filter_map(|r| r.as_ref().ok())
                    .map(|o| o.quantity().get())
                    .sum();
                let remaining = stock_of(&processor, "p1").await;

                prop_assert!(remaining >= 0);
                prop_assert_eq!(placed + remaining, initial);

                // Any rejection means the remaining stock could not cover that request.
                for (result, qty) in results.iter().zip(&quantities) {
                    if result.is_err() {
                        prop_assert!(remaining < *qty);
                    }
                }

                let recorded: i64 = processor
                    .orders()
                    .list_for_product(&pid("p1"))
                    .await
                    .unwrap()
                    .iter()
                    .map(|o| o.quantity().get())
                    .sum();
                prop_assert_eq!(recorded, placed);
                Ok(())
            })?;
        }
    }
}
