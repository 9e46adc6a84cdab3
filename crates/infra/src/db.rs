//! Postgres pool construction and schema bootstrap.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::error::{map_sqlx_error, StoreError};

/// Statements run (in order) by [`ensure_schema`]. Every one is idempotent.
///
/// `orders.product_id` has no foreign key: products may be deleted while
/// their orders remain on file.
pub const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS products (
        product_id TEXT PRIMARY KEY,
        quantity   BIGINT NOT NULL CHECK (quantity >= 0),
        metadata   JSONB  NOT NULL DEFAULT '{}'::jsonb
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        order_id   UUID PRIMARY KEY,
        product_id TEXT NOT NULL,
        quantity   BIGINT NOT NULL CHECK (quantity > 0),
        created_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS orders_product_id_idx ON orders (product_id, created_at)
    "#,
];

/// Open a bounded connection pool.
pub async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, StoreError> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .map_err(|e| map_sqlx_error("connect", e))
}

/// Create the `products` and `orders` tables if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), StoreError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| map_sqlx_error("ensure_schema", e))?;
    }
    tracing::info!("database schema ready");
    Ok(())
}
