pub mod config;
pub mod domain;
pub mod error;
pub mod handlers;
pub mod health;
pub mod middleware;
pub mod openapi;
pub mod presentation;
pub mod schemas;
pub mod services;
pub mod utils;
pub mod yaya;

use crate::config::Config;
use crate::health::{HealthChecker, UpstreamChecker};
use crate::services::{TransactionAggregator, TransactionService};
use crate::yaya::YayaClient;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use utoipa::OpenApi;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub transactions: TransactionService,
    pub health_checker: Arc<HealthChecker>,
}

impl AppState {
    /// Builds the upstream client and everything that shares it.
    pub fn from_config(config: Config) -> Self {
        let client = YayaClient::new(&config.upstream);
        let aggregator = TransactionAggregator::new(config.max_upstream_pages, config.sums_source);
        let health_checker =
            HealthChecker::new().add_checker(Box::new(UpstreamChecker::new(client.clone())));

        Self {
            transactions: TransactionService::new(client, aggregator),
            health_checker: Arc::new(health_checker),
            config: Arc::new(config),
        }
    }
}

/// Unset or empty origin list allows any origin.
fn cors_layer(allowed_origins: Option<&str>) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| HeaderValue::from_str(part).ok())
        .collect();

    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn create_app(app_state: AppState) -> Router {
    let cors = cors_layer(app_state.config.cors_allowed_origins.as_deref());

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/api/transactions", get(handlers::transactions::list_transactions))
        .route(
            "/api/transactions/search",
            post(handlers::transactions::search_transactions),
        )
        .route("/dashboard", get(handlers::dashboard::dashboard))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(openapi::ApiDoc::openapi()) }),
        )
        .fallback(handlers::not_found)
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(cors)
        .layer(axum::middleware::from_fn(
            middleware::request_logger::request_logger_middleware,
        ))
}
