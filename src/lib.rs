// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::aws;
pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::metrics;

// Domain layer
pub mod connection;
pub mod dispatcher;
pub mod event;
pub mod registry;
pub mod sender;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod telemetry;
