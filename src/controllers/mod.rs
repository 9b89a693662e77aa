pub mod layouts;
pub mod rooms;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn routes() -> Router<Arc<crate::AppState>> {
    Router::new()
        .merge(rooms::routes())
        .merge(layouts::routes())
}

/// Full application router, shared by the binary and the HTTP tests.
pub fn app(state: Arc<crate::AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Cinema seating API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
