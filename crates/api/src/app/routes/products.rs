use std::sync::Arc;

use axum::{extract::Extension, response::IntoResponse, Json};

use crate::app::errors;
use crate::app::services::AppServices;

/// Full catalog scan, unpaginated.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.inventory().list().await {
        Ok(products) => Json(products).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to list products");
            errors::store_error_to_response(e)
        }
    }
}
