//! HTTP routes.

pub mod chat;
pub mod credential;
pub mod diagram;
pub mod health;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::app::AppState;

/// Builds the full API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(chat::router())
        .merge(credential::router())
        .merge(diagram::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
