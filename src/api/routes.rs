use axum::{
    routing::{get, post},
    Router,
};

use crate::server::AppState;

use super::events::handle_event;
use super::health::{health, stats};
use super::metrics::prometheus_metrics;

pub fn api_routes(events_path: &str) -> Router<AppState> {
    Router::new()
        // Gateway events
        .route(events_path, post(handle_event))
        // Health & Stats
        .route("/health", get(health))
        .route("/stats", get(stats))
        .route("/metrics", get(prometheus_metrics))
}
