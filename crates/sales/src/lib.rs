//! Sales domain module.
//!
//! Order records and order-request validation, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod order;

pub use order::{Order, PlaceOrder};
