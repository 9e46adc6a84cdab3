//! Postgres-backed inventory store.
//!
//! The conditional decrement is a single guarded `UPDATE`:
//!
//! ```sql
//! UPDATE products SET quantity = quantity - $2
//! WHERE product_id = $1 AND quantity >= $2
//! RETURNING quantity
//! ```
//!
//! Postgres row locking serializes concurrent updates of the same row and
//! re-evaluates the `WHERE` clause against the latest committed version, so
//! the guard holds at the instant of application. Rows for different products
//! are locked independently. A `CHECK (quantity >= 0)` constraint backs the
//! invariant at the schema level.

use serde_json::{Map, Value as JsonValue};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use storefront_inventory::{Product, ProductId, Quantity};

use super::r#trait::{DecrementOutcome, InventoryStore};
use crate::error::{map_sqlx_error, StoreError};

/// Postgres-backed inventory store over the `products` table.
///
/// `Send + Sync`; the SQLx pool handles connection sharing.
#[derive(Debug, Clone)]
pub struct PostgresInventoryStore {
    pool: PgPool,
}

impl PostgresInventoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| StoreError::backend(format!("failed to decode product row: {e}"));

    let product_id: String = row.try_get("product_id").map_err(decode)?;
    let quantity: i64 = row.try_get("quantity").map_err(decode)?;
    let Json(metadata): Json<Map<String, JsonValue>> = row.try_get("metadata").map_err(decode)?;

    let product_id = ProductId::new(product_id).map_err(|e| StoreError::backend(e.to_string()))?;
    Product::new(product_id, quantity, metadata).map_err(|e| StoreError::backend(e.to_string()))
}

#[async_trait::async_trait]
impl InventoryStore for PostgresInventoryStore {
    #[instrument(skip_all, fields(product_id = %product_id), err)]
    async fn get(&self, product_id: &ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT product_id, quantity, metadata
            FROM products
            WHERE product_id = $1
            "#,
        )
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("get_product", e))?;

        row.as_ref().map(product_from_row).transpose()
    }

    #[instrument(skip_all, fields(product_id = %product_id, amount = amount.get()), err)]
    async fn conditional_decrement(
        &self,
        product_id: &ProductId,
        amount: Quantity,
    ) -> Result<DecrementOutcome, StoreError> {
        let updated = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - $2
            WHERE product_id = $1 AND quantity >= $2
            RETURNING quantity
            "#,
        )
        .bind(product_id.as_str())
        .bind(amount.get())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("conditional_decrement", e))?;

        // A returned row means the write committed, whatever happens while decoding it.
        if let Some(row) = updated {
            let remaining = match row.try_get::<i64, _>("quantity") {
                Ok(remaining) => Some(remaining),
                Err(e) => {
                    tracing::warn!(
                        %product_id,
                        error = %e,
                        "decrement applied but remaining stock unreadable"
                    );
                    None
                }
            };
            return Ok(DecrementOutcome::Applied { remaining });
        }

        // Nothing updated: either the guard failed or the row is gone.
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM products WHERE product_id = $1)",
        )
        .bind(product_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("conditional_decrement_exists", e))?;

        Ok(if exists {
            DecrementOutcome::ConditionFailed
        } else {
            DecrementOutcome::NotFound
        })
    }

    #[instrument(skip_all, err)]
    async fn list(&self) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, quantity, metadata
            FROM products
            ORDER BY product_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip_all, fields(product_id = %product.product_id()), err)]
    async fn insert(&self, product: Product) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO products (product_id, quantity, metadata)
            VALUES ($1, $2, $3)
            ON CONFLICT (product_id) DO NOTHING
            "#,
        )
        .bind(product.product_id().as_str())
        .bind(product.quantity())
        .bind(Json(product.metadata()))
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_product", e))?;

        Ok(result.rows_affected() == 1)
    }

    #[instrument(skip_all, fields(product_id = %product_id), err)]
    async fn delete(&self, product_id: &ProductId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(product_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_product", e))?;

        Ok(result.rows_affected() == 1)
    }
}
