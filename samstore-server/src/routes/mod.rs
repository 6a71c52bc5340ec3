pub mod catalog;

use crate::AppState;
use axum::Router;

/// Create the main API router
pub fn create_api_router() -> Router<AppState> {
    Router::new().nest("/api", catalog::create_catalog_router())
}
