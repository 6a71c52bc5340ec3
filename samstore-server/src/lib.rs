//! # SamStore Server
//!
//! JSON HTTP API over the SamStore catalog: the category tree, products
//! with their lines and images, the attribute model, and the read-side
//! catalog views.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use handlers::health::{health_handler, ping_handler};

pub fn create_app(state: AppState) -> Router {
    // Build CORS layer (permissive in dev, allow-list in prod)
    let cors_layer = if state.config().dev_mode {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config()
            .cors_allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();
        let allow_origin = if origins.is_empty() {
            AllowOrigin::any()
        } else {
            AllowOrigin::list(origins)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
    };

    Router::new()
        .route("/ping", get(ping_handler))
        .route("/health", get(health_handler))
        .merge(routes::create_api_router())
        // CORS outermost, then tracing
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}
