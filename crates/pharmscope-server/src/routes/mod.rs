//! HTTP route handlers — the JSON API surface under `/api`.

pub mod analyses;
pub mod export;
pub mod funnels;
pub mod info;
pub mod intelligence;
pub mod trials;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(info::routes())
        .merge(analyses::routes())
        .merge(funnels::routes())
        .merge(intelligence::routes())
        .merge(export::routes())
        .merge(trials::routes())
}
