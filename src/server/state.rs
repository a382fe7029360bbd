use std::sync::Arc;
use std::time::Instant;

use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::dispatcher::GatewayDispatcher;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub dispatcher: Arc<GatewayDispatcher>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(settings: Settings, dispatcher: Arc<GatewayDispatcher>) -> Self {
        Self {
            settings: Arc::new(settings),
            dispatcher,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }
}
