//! Postgres-backed stores against a live database.
//!
//! Ignored by default; run with `DATABASE_URL=postgres://... cargo test -- --ignored`.
//! Every test works on its own product ids, so runs can share one database.

use std::env;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Map;
use sqlx::PgPool;

use storefront_infra::db::{connect, ensure_schema};
use storefront_infra::inventory_store::{DecrementOutcome, InventoryStore, PostgresInventoryStore};
use storefront_infra::order_log::{OrderLog, PostgresOrderLog};
use storefront_infra::{OrderProcessor, PlaceOrderError, StoreError};
use storefront_inventory::{Product, ProductId, Quantity};
use storefront_sales::{Order, PlaceOrder};

async fn pool() -> Option<PgPool> {
    let database_url = match env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => return None,
    };
    let pool = connect(&database_url, 8).await.expect("pg pool");
    ensure_schema(&pool).await.expect("schema");
    Some(pool)
}

fn unique_id(label: &str) -> ProductId {
    ProductId::new(format!("{label}-{}", uuid::Uuid::now_v7())).unwrap()
}

fn product(id: &ProductId, quantity: i64) -> Product {
    Product::new(id.clone(), quantity, Map::new()).unwrap()
}

fn qty(n: i64) -> Quantity {
    Quantity::new(n).unwrap()
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn last_unit_goes_to_exactly_one_buyer() {
    let Some(pool) = pool().await else { return };
    let store = Arc::new(PostgresInventoryStore::new(pool));
    let id = unique_id("last-unit");
    assert!(store.insert(product(&id, 1)).await.unwrap());

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = store.clone();
            let id = id.clone();
            tokio::spawn(async move { store.conditional_decrement(&id, qty(1)).await.unwrap() })
        })
        .collect();

    let mut applied = 0;
    for handle in handles {
        match handle.await.unwrap() {
            DecrementOutcome::Applied { remaining } => {
                assert_eq!(remaining, Some(0));
                applied += 1;
            }
            DecrementOutcome::ConditionFailed => {}
            DecrementOutcome::NotFound => panic!("product vanished"),
        }
    }
    assert_eq!(applied, 1);
    assert_eq!(store.get(&id).await.unwrap().unwrap().quantity(), 0);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn decrement_tells_missing_from_short() {
    let Some(pool) = pool().await else { return };
    let store = PostgresInventoryStore::new(pool);

    let missing = unique_id("missing");
    let outcome = store.conditional_decrement(&missing, qty(1)).await.unwrap();
    assert_eq!(outcome, DecrementOutcome::NotFound);

    let id = unique_id("short");
    store.insert(product(&id, 2)).await.unwrap();
    let outcome = store.conditional_decrement(&id, qty(3)).await.unwrap();
    assert_eq!(outcome, DecrementOutcome::ConditionFailed);
    assert_eq!(store.get(&id).await.unwrap().unwrap().quantity(), 2);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn concurrent_decrements_conserve_stock() {
    let Some(pool) = pool().await else { return };
    let store = Arc::new(PostgresInventoryStore::new(pool));
    let id = unique_id("conserve");
    store.insert(product(&id, 25)).await.unwrap();

    // 40 buyers of 1..=3 units each ask for far more than is on hand.
    let handles: Vec<_> = (0..40)
        .map(|i| {
            let store = store.clone();
            let id = id.clone();
            let amount = (i % 3) + 1;
            tokio::spawn(async move {
                match store.conditional_decrement(&id, qty(amount)).await.unwrap() {
                    DecrementOutcome::Applied { .. } => amount,
                    _ => 0,
                }
            })
        })
        .collect();

    let mut taken = 0;
    for handle in handles {
        taken += handle.await.unwrap();
    }
    let left = store.get(&id).await.unwrap().unwrap().quantity();
    assert!(left >= 0);
    assert_eq!(taken + left, 25);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn insert_never_overwrites_existing_stock() {
    let Some(pool) = pool().await else { return };
    let store = PostgresInventoryStore::new(pool);
    let id = unique_id("seed");

    assert!(store.insert(product(&id, 10)).await.unwrap());
    store.conditional_decrement(&id, qty(4)).await.unwrap();

    assert!(!store.insert(product(&id, 10)).await.unwrap());
    assert_eq!(store.get(&id).await.unwrap().unwrap().quantity(), 6);

    assert!(store.delete(&id).await.unwrap());
    assert!(!store.delete(&id).await.unwrap());
    assert!(store.get(&id).await.unwrap().is_none());
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn schema_refuses_negative_stock() {
    let Some(pool) = pool().await else { return };
    let store = PostgresInventoryStore::new(pool.clone());
    let id = unique_id("check");
    store.insert(product(&id, 1)).await.unwrap();

    let err = sqlx::query("UPDATE products SET quantity = -1 WHERE product_id = $1")
        .bind(id.as_str())
        .execute(&pool)
        .await
        .unwrap_err();
    let code = err.as_database_error().and_then(|e| e.code()).map(|c| c.into_owned());
    assert_eq!(code.as_deref(), Some("23514"));
    assert_eq!(store.get(&id).await.unwrap().unwrap().quantity(), 1);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn order_log_rejects_duplicates_and_lists_oldest_first() {
    let Some(pool) = pool().await else { return };
    let log = PostgresOrderLog::new(pool);
    let id = unique_id("orders");

    let now = Utc::now();
    let earlier = Order::fulfil(PlaceOrder::new(id.as_str(), 1).unwrap(), now);
    let later = Order::fulfil(
        PlaceOrder::new(id.as_str(), 2).unwrap(),
        now + chrono::Duration::seconds(5),
    );
    log.append(&later).await.unwrap();
    log.append(&earlier).await.unwrap();

    let err = log.append(&earlier).await.unwrap_err();
    assert!(matches!(err, StoreError::Backend(msg) if msg.contains("duplicate key")));

    let fetched = log.get(earlier.order_id()).await.unwrap().unwrap();
    assert_eq!(fetched.product_id(), &id);
    assert_eq!(fetched.quantity(), qty(1));

    let listed: Vec<_> = log
        .list_for_product(&id)
        .await
        .unwrap()
        .iter()
        .map(Order::order_id)
        .collect();
    assert_eq!(listed, vec![earlier.order_id(), later.order_id()]);
}

#[tokio::test(flavor = "multi_thread")]
#[ignore]
async fn processor_over_postgres_records_every_sale() {
    let Some(pool) = pool().await else { return };
    let processor = Arc::new(OrderProcessor::new(
        PostgresInventoryStore::new(pool.clone()),
        PostgresOrderLog::new(pool),
    ));
    let id = unique_id("processor");
    processor.inventory().insert(product(&id, 3)).await.unwrap();

    let handles: Vec<_> = (0..6)
        .map(|_| {
            let processor = processor.clone();
            let id = id.clone();
            tokio::spawn(async move { processor.place_order(id.as_str(), 1).await })
        })
        .collect();

    let mut placed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(PlaceOrderError::InsufficientStock { .. }) => {}
            Err(other) => panic!("unexpected failure: {other}"),
        }
    }
    assert_eq!(placed, 3);
    assert_eq!(processor.orders().list_for_product(&id).await.unwrap().len(), 3);
    assert_eq!(processor.inventory().get(&id).await.unwrap().unwrap().quantity(), 0);
}
