//! API layer - HTTP endpoint handlers.

mod events;
mod health;
mod metrics;
mod routes;

pub use events::handle_event;
pub use health::{health, stats, HealthResponse, StatsResponse};
pub use metrics::prometheus_metrics;
pub use routes::api_routes;
