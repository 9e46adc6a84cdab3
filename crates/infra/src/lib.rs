//! Infrastructure layer: storage backends, order processing, config.

pub mod catalog_seed;
pub mod config;
pub mod db;
pub mod error;
pub mod inventory_store;
pub mod order_log;
pub mod order_processor;

mod integration_tests;

pub use error::StoreError;
pub use order_processor::{OrderProcessor, PlaceOrderError};
