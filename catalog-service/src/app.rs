use std::sync::Arc;

use axum::extract::State;
use axum::http::{
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
    HeaderValue, Method,
};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use common_http_errors::{error_envelope, ApiError};
use common_security::{authenticate, AccessPolicy, RequestAuthenticator};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::category_handlers::{create_category, delete_category, get_category, list_categories};
use crate::metrics::{error_metrics_mw, ServiceMetrics};
use crate::product_handlers::{
    create_product, delete_product, get_product, list_products, products_by_category,
    update_product,
};
use crate::user_handlers::{login, register};
use crate::AppState;

async fn health() -> &'static str {
    "ok"
}

async fn metrics_endpoint(State(metrics): State<Arc<ServiceMetrics>>) -> Response {
    match metrics.render() {
        Ok(resp) => resp,
        Err(err) => ApiError::internal(err).into_response(),
    }
}

/// Full HTTP surface. Layers run outermost first: error envelope, error
/// metrics, then authentication ahead of every route.
pub fn build_router(state: AppState) -> Router {
    let authenticator = RequestAuthenticator::new(
        state.codec.clone(),
        Arc::new(AccessPolicy::catalog_default()),
    );
    let metrics = state.metrics.clone();

    Router::new()
        .route("/healthz", get(health))
        .route("/metrics", get(metrics_endpoint))
        .route("/user/register", post(register))
        .route("/user/login", post(login))
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/:id", get(get_category).delete(delete_category))
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/api/products/category/:category_id", get(products_by_category))
        .layer(middleware::from_fn_with_state(authenticator, authenticate))
        .layer(middleware::from_fn_with_state(metrics, error_metrics_mw))
        .layer(middleware::from_fn(error_envelope))
        .with_state(state)
}

pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(origin = %origin, error = %err, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ACCEPT, CONTENT_TYPE, AUTHORIZATION])
}
