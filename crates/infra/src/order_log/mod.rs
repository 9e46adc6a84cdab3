//! Durable, append-only log of fulfilled orders.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryOrderLog;
pub use postgres::PostgresOrderLog;
pub use r#trait::OrderLog;
