//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store backends and the order processor
//! - `routes/`: HTTP handlers
//! - `dto.rs`: request parsing and response JSON
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use storefront_infra::config::AppConfig;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::{AppServices, ServicesError};

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> Result<Router, ServicesError> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router(services, config.stage_prefix.clone()))
}

/// Router over already-wired services.
///
/// Path normalization has to happen before routing, so the routes sit behind
/// an outer router whose only job is to run the rewrite and hand off.
pub fn router(services: Arc<AppServices>, stage_prefix: Option<String>) -> Router {
    let routes = routes::router().layer(Extension(services));

    Router::new()
        .fallback_service(routes)
        .layer(axum::middleware::from_fn_with_state(
            middleware::PathRules::new(stage_prefix),
            middleware::normalize_path,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
                .layer(CatchPanicLayer::custom(errors::panic_to_response)),
        )
}
