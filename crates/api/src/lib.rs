//! HTTP API for the storefront.
//!
//! Every `/api` response is an [`common::Envelope`]. Handler failures,
//! extractor rejections, unknown routes, missing credentials and panics all
//! go through [`error::normalize`].

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod reply;
pub mod routes;

use std::any::Any;
use std::sync::Arc;

use axum::Router;
use axum::extract::OriginalUri;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Storefront;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::ApiToken;
use error::ApiError;
use routes::{AppState, categories, customers, orders, products, system};

/// Creates the application router with all routes and shared state.
///
/// When `api_token` is set, every `/api` route requires it as a bearer
/// token. `/health` and `/metrics` stay open.
pub fn create_app<S: Storefront>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    api_token: Option<String>,
) -> Router {
    let mut api = api_routes::<S>().with_state(state);
    if let Some(token) = api_token {
        api = api.route_layer(middleware::from_fn_with_state(
            ApiToken::new(token),
            auth::require_bearer,
        ));
    }

    let system_router = Router::new()
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics))
        .with_state(metrics_handle);

    with_boundary(Router::new().nest("/api", api).merge(system_router))
}

/// Creates the default application state over `store`.
pub fn create_default_state<S: Storefront>(store: S) -> Arc<AppState<S>> {
    Arc::new(AppState::new(store))
}

/// Wraps a router in the envelope boundary: unknown routes and handler
/// panics become failure envelopes, and requests are traced.
pub fn with_boundary(router: Router) -> Router {
    router
        .fallback(unknown_route)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(
            CorsLayer::new()
                .allow_origin(AnyOrigin)
                .allow_methods(AnyOrigin)
                .allow_headers(AnyOrigin),
        )
        .layer(TraceLayer::new_for_http())
}

fn api_routes<S: Storefront>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route(
            "/categories",
            get(categories::list::<S>).post(categories::create::<S>),
        )
        .route(
            "/categories/{id}",
            get(categories::get::<S>).delete(categories::delete::<S>),
        )
        .route("/categories/{id}/products", get(categories::products::<S>))
        .route(
            "/products",
            get(products::list::<S>).post(products::create::<S>),
        )
        .route("/products/search", get(products::search::<S>))
        .route(
            "/products/{id}",
            get(products::get::<S>)
                .patch(products::update::<S>)
                .delete(products::delete::<S>),
        )
        .route("/products/{id}/image", post(products::upload_image::<S>))
        .route(
            "/customers",
            get(customers::list::<S>).post(customers::create::<S>),
        )
        .route("/customers/search", get(customers::search::<S>))
        .route(
            "/customers/{id}",
            get(customers::get::<S>)
                .patch(customers::update::<S>)
                .delete(customers::delete::<S>),
        )
        .route(
            "/customers/{id}/addresses",
            get(customers::addresses::<S>).post(customers::add_address::<S>),
        )
        .route(
            "/customers/{id}/addresses/{address_id}",
            delete(customers::delete_address::<S>),
        )
        .route("/customers/{id}/orders", get(customers::orders::<S>))
        .route("/orders", get(orders::list::<S>).post(orders::create::<S>))
        .route("/orders/search", get(orders::search::<S>))
        .route("/orders/statistics", get(orders::statistics::<S>))
        .route(
            "/orders/{id}",
            get(orders::get::<S>).delete(orders::delete::<S>),
        )
        .route("/orders/{id}/status", patch(orders::update_status::<S>))
}

async fn unknown_route(OriginalUri(uri): OriginalUri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}

fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    tracing::error!(panic = detail, "handler panicked");

    ApiError::unclassified(common::ErrorCode::InternalError.default_message()).into_response()
}
