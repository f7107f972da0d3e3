//! HTTP binding for the single-table commerce backend.
//!
//! Thin axum layer over the use-case services: routes, request/response
//! DTOs, and error-to-status mapping, with structured logging (tracing)
//! and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post, put};
use metrics_exporter_prometheus::PrometheusHandle;
use table_store::TableStore;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use usecase::{CustomerService, OrderService, PlaceOrder, ProductService};

/// Shared application state accessible from all handlers.
pub struct AppState<S> {
    pub customers: CustomerService<S>,
    pub products: ProductService<S>,
    pub orders: OrderService<S>,
    pub place_order: PlaceOrder<S>,
}

impl<S: TableStore + Clone> AppState<S> {
    /// Wires every service over one shared store handle.
    pub fn new(store: S) -> Self {
        Self {
            customers: CustomerService::new(store.clone()),
            products: ProductService::new(store.clone()),
            orders: OrderService::new(store.clone()),
            place_order: PlaceOrder::new(store),
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: TableStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::render))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/customers", post(routes::customers::create::<S>))
        .route("/customers", get(routes::customers::list::<S>))
        .route("/customers/{id}", get(routes::customers::get::<S>))
        .route("/customers/{id}", put(routes::customers::update::<S>))
        .route(
            "/customers/{id}",
            axum::routing::delete(routes::customers::delete::<S>),
        )
        .route("/products", post(routes::products::create::<S>))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/{id}", get(routes::products::get::<S>))
        .route("/products/{id}", put(routes::products::update::<S>))
        .route(
            "/products/{id}",
            axum::routing::delete(routes::products::delete::<S>),
        )
        .route("/products/{id}/restock", post(routes::products::restock::<S>))
        .route("/orders", post(routes::orders::place::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route(
            "/orders/{id}",
            axum::routing::delete(routes::orders::delete::<S>),
        )
        .route("/orders/{id}/status", post(routes::orders::update_status::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
