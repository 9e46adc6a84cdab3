//! Inventory domain module.
//!
//! Product records and the stock rules every inventory backend must honour,
//! implemented purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod product;
pub mod stock;

pub use product::{Product, ProductId, Quantity};
