use axum::{
    routing::{get, post},
    Router,
};

pub mod orders;
pub mod products;
pub mod system;

/// Storefront routes, matched against already-normalized paths.
///
/// A known path with the wrong method gets the same 404 as an unknown path.
pub fn router() -> Router {
    Router::new()
        .route("/health", get(system::health).fallback(system::route_not_found))
        .route("/hello", get(system::hello).fallback(system::route_not_found))
        .route("/products", get(products::list_products).fallback(system::route_not_found))
        .route("/order", post(orders::place_order).fallback(system::route_not_found))
        .route("/order/:order_id", get(orders::get_order).fallback(system::route_not_found))
        .route("/orders", get(orders::list_orders).fallback(system::route_not_found))
        .fallback(system::route_not_found)
}
