use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use storefront_core::OrderId;
use storefront_inventory::ProductId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub async fn place_order(
    Extension(services): Extension<Arc<AppServices>>,
    body: Bytes,
) -> axum::response::Response {
    let request = match dto::PlaceOrderRequest::parse(&body) {
        Ok(r) => r,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
    };
    let product_id = match request.product_id() {
        Ok(id) => id,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
    };
    let quantity = match request.quantity() {
        Ok(q) => q,
        Err(msg) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", msg),
    };

    match services.processor().place_order(product_id, quantity).await {
        Ok(order) => (StatusCode::CREATED, Json(dto::order_created_json(&order))).into_response(),
        Err(e) => errors::place_order_error_to_response(e),
    }
}

pub async fn get_order(
    Extension(services): Extension<Arc<AppServices>>,
    Path(order_id): Path<String>,
) -> axum::response::Response {
    let order_id: OrderId = match order_id.parse() {
        Ok(id) => id,
        Err(e) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_order_id", e.to_string())
        }
    };

    match services.orders().get(order_id).await {
        Ok(Some(order)) => Json(order).into_response(),
        Ok(None) => errors::json_error(
            StatusCode::NOT_FOUND,
            "order_not_found",
            format!("order {order_id} not found"),
        ),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Orders recorded for one product, oldest first.
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::OrdersQuery>,
) -> axum::response::Response {
    let product_id = match query.product_id.map(ProductId::new) {
        Some(Ok(id)) => id,
        Some(Err(e)) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_input", e.to_string())
        }
        None => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_input",
                "product_id query parameter is required",
            )
        }
    };

    match services.orders().list_for_product(&product_id).await {
        Ok(orders) => Json(orders).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}
