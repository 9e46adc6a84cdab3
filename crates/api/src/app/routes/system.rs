use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::app::errors;

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn hello() -> impl IntoResponse {
    Json(serde_json::json!({ "message": "Hello from the storefront!" }))
}

pub async fn route_not_found(
    method: axum::http::Method,
    uri: axum::http::Uri,
) -> axum::response::Response {
    errors::json_error(
        StatusCode::NOT_FOUND,
        "route_not_found",
        format!("no route for {method} {}", uri.path()),
    )
}
