//! Inventory store boundary.
//!
//! Defines the product store contract (with its conditional decrement) and the
//! backends implementing it.

pub mod in_memory;
pub mod postgres;
pub mod r#trait;

pub use in_memory::InMemoryInventoryStore;
pub use postgres::PostgresInventoryStore;
pub use r#trait::{DecrementOutcome, InventoryStore};
