use std::any::Any;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use serde_json::json;

use storefront_infra::{PlaceOrderError, StoreError};

/// Seconds a client should wait before retrying a 503.
const RETRY_AFTER_SECS: &str = "1";

pub fn place_order_error_to_response(err: PlaceOrderError) -> axum::response::Response {
    if err.is_retryable() {
        return retry_later(err.to_string());
    }

    match err {
        PlaceOrderError::InvalidInput(msg) => {
            json_error(StatusCode::BAD_REQUEST, "invalid_input", msg)
        }
        PlaceOrderError::ProductNotFound(product_id) => json_error(
            StatusCode::NOT_FOUND,
            "product_not_found",
            format!("product {product_id} not found"),
        ),
        PlaceOrderError::InsufficientStock {
            product_id,
            requested,
            available,
        } => (
            StatusCode::CONFLICT,
            axum::Json(json!({
                "error": "insufficient_stock",
                "message": format!("insufficient stock for {product_id}"),
                "product_id": product_id,
                "requested": requested,
                "available": available,
            })),
        )
            .into_response(),
        PlaceOrderError::PartialFailure {
            order_id,
            product_id,
            quantity,
            source,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({
                "error": "partial_failure",
                "message": format!(
                    "stock was reserved but the order could not be recorded: {source}"
                ),
                "order_id": order_id.to_string(),
                "product_id": product_id,
                "quantity": quantity,
            })),
        )
            .into_response(),
        PlaceOrderError::DecrementUnconfirmed {
            product_id,
            quantity,
            source,
        } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            axum::Json(json!({
                "error": "decrement_unconfirmed",
                "message": format!(
                    "stock may have been reserved; do not resubmit before reconciling: {source}"
                ),
                "product_id": product_id,
                "quantity": quantity,
            })),
        )
            .into_response(),
        PlaceOrderError::StoreUnavailable(e) => store_error_to_response(e),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::Unavailable(msg) => retry_later(msg),
        StoreError::Backend(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

fn retry_later(message: String) -> axum::response::Response {
    let mut res = json_error(StatusCode::SERVICE_UNAVAILABLE, "store_unavailable", message);
    res.headers_mut().insert(
        header::RETRY_AFTER,
        header::HeaderValue::from_static(RETRY_AFTER_SECS),
    );
    res
}

/// Last-resort answer for a handler that panicked.
pub fn panic_to_response(panic: Box<dyn Any + Send + 'static>) -> axum::response::Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic"
    };
    tracing::error!(panic = %detail, "request handler panicked");
    json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "internal server error")
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
