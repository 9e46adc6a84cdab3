//! Postgres-backed order log over the `orders` table.
//!
//! `orders.product_id` has no foreign key: a product may be
//! deleted while its orders stay on record.

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use storefront_core::OrderId;
use storefront_inventory::{ProductId, Quantity};
use storefront_sales::Order;

use super::r#trait::OrderLog;
use crate::error::{map_sqlx_error, StoreError};

#[derive(Debug, Clone)]
pub struct PostgresOrderLog {
    pool: PgPool,
}

impl PostgresOrderLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn order_from_row(row: &PgRow) -> Result<Order, StoreError> {
    let decode = |e: sqlx::Error| StoreError::backend(format!("failed to decode order row: {e}"));

    let order_id: Uuid = row.try_get("order_id").map_err(decode)?;
    let product_id: String = row.try_get("product_id").map_err(decode)?;
    let quantity: i64 = row.try_get("quantity").map_err(decode)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(decode)?;

    let invalid = |e: storefront_core::DomainError| StoreError::backend(e.to_string());
    Ok(Order::from_parts(
        OrderId::from_uuid(order_id),
        ProductId::new(product_id).map_err(invalid)?,
        Quantity::new(quantity).map_err(invalid)?,
        created_at,
    ))
}

#[async_trait::async_trait]
impl OrderLog for PostgresOrderLog {
    #[instrument(
        skip_all,
        fields(
            order_id = %order.order_id(),
            product_id = %order.product_id(),
            quantity = order.quantity().get()
        ),
        err
    )]
    async fn append(&self, order: &Order) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO orders (order_id, product_id, quantity, created_at)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(order.order_id().as_uuid())
        .bind(order.product_id().as_str())
        .bind(order.quantity().get())
        .bind(order.created_at())
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("append_order", e))?;

        Ok(())
    }

    #[instrument(skip_all, fields(order_id = %order_id), err)]
    async fn get(&self, order_id: OrderId) -> Result<Option<Order>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT order_id, product_id, quantity, created_at
            FROM orders
            WHERE order_id = $1
            "#,
        )
        .bind(order_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_order", e))?;

        row.as_ref().map(order_from_row).transpose()
    }

    #[instrument(skip_all, fields(product_id = %product_id), err)]
    async fn list_for_product(&self, product_id: &ProductId) -> Result<Vec<Order>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT order_id, product_id, quantity, created_at
            FROM orders
            WHERE product_id = $1
            ORDER BY created_at ASC, order_id ASC
            "#,
        )
        .bind(product_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_orders_for_product", e))?;

        rows.iter().map(order_from_row).collect()
    }
}
