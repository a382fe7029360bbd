//! Gateway event endpoint.

use axum::{extract::State, Json};

use crate::dispatcher::Acknowledgment;
use crate::error::Result;
use crate::event::GatewayEvent;
use crate::server::AppState;

/// POST <events_path> - dispatch one raw gateway event
pub async fn handle_event(
    State(state): State<AppState>,
    Json(event): Json<GatewayEvent>,
) -> Result<Json<Acknowledgment>> {
    let ack = state.dispatcher.dispatch(&event).await?;
    Ok(Json(ack))
}
