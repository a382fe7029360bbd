//! Gateway event dispatcher
//!
//! Classifies each inbound event and routes it to the connection registry
//! (connect / disconnect) or to the outbound sender (message). Every handled
//! or ignored event is acknowledged with the same `{"statusCode":200}`
//! response; failures of the underlying action are returned as errors so the
//! invocation layer can treat them as failed invocations.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::connection::{build_connection, ConnectionContext, Message};
use crate::error::Result;
use crate::event::{EventKind, GatewayEvent};
use crate::metrics::EventMetrics;
use crate::registry::ConnectionRegistry;
use crate::sender::MessageSender;

/// Prefix prepended to every echoed message body
pub const REPLY_PREFIX: &str = "You said ";

/// Format the reply pushed back for a MESSAGE event
pub fn format_reply(body: Option<&str>) -> String {
    format!("{}{}", REPLY_PREFIX, body.unwrap_or_default())
}

/// Uniform response returned to the gateway
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Acknowledgment {
    pub status_code: u16,
}

impl Acknowledgment {
    pub fn ok() -> Self {
        Self { status_code: 200 }
    }
}

/// Statistics for the gateway dispatcher
#[derive(Debug, Default)]
pub struct DispatcherStats {
    pub connects: AtomicU64,
    pub disconnects: AtomicU64,
    pub messages: AtomicU64,
    /// Events with an unknown or missing event type
    pub ignored: AtomicU64,
    /// Events whose action returned an error
    pub failed: AtomicU64,
}

impl DispatcherStats {
    fn record_kind(&self, kind: EventKind) {
        let counter = match kind {
            EventKind::Connect => &self.connects,
            EventKind::Disconnect => &self.disconnects,
            EventKind::Message => &self.messages,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> DispatcherStatsSnapshot {
        DispatcherStatsSnapshot {
            connects: self.connects.load(Ordering::Relaxed),
            disconnects: self.disconnects.load(Ordering::Relaxed),
            messages: self.messages.load(Ordering::Relaxed),
            ignored: self.ignored.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Snapshot of dispatcher statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatcherStatsSnapshot {
    pub connects: u64,
    pub disconnects: u64,
    pub messages: u64,
    pub ignored: u64,
    pub failed: u64,
}

/// Routes gateway events to the registry or the sender
pub struct GatewayDispatcher {
    registry: Arc<dyn ConnectionRegistry>,
    sender: Arc<dyn MessageSender>,
    /// Deployment region, taken from the execution environment
    region: Option<String>,
    stats: DispatcherStats,
}

impl GatewayDispatcher {
    pub fn new(
        registry: Arc<dyn ConnectionRegistry>,
        sender: Arc<dyn MessageSender>,
        region: Option<String>,
    ) -> Self {
        Self {
            registry,
            sender,
            region,
            stats: DispatcherStats::default(),
        }
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn registry(&self) -> &Arc<dyn ConnectionRegistry> {
        &self.registry
    }

    pub fn stats(&self) -> DispatcherStatsSnapshot {
        self.stats.snapshot()
    }

    /// Dispatch one gateway event
    #[tracing::instrument(
        name = "dispatcher.dispatch",
        skip(self, event),
        fields(
            event_type = ?event.request_context.event_type,
            connection_id = ?event.request_context.connection_id,
            request_id = ?event.request_context.request_id
        )
    )]
    pub async fn dispatch(&self, event: &GatewayEvent) -> Result<Acknowledgment> {
        let Some(kind) = event.kind() else {
            self.stats.ignored.fetch_add(1, Ordering::Relaxed);
            EventMetrics::record_ignored();
            tracing::debug!("Ignoring event with unrecognized event type");
            return Ok(Acknowledgment::ok());
        };

        self.stats.record_kind(kind);
        EventMetrics::record(kind);

        if let Err(e) = self.handle(kind, event).await {
            self.stats.failed.fetch_add(1, Ordering::Relaxed);
            EventMetrics::record_failure(e.code());
            tracing::warn!(event_kind = %kind, error = %e, "Event handling failed");
            return Err(e);
        }

        Ok(Acknowledgment::ok())
    }

    async fn handle(&self, kind: EventKind, event: &GatewayEvent) -> Result<()> {
        let context = ConnectionContext::from_event(event, self.region.as_deref());
        let connection = build_connection(&context)?;

        match kind {
            EventKind::Connect => {
                self.registry.save(&connection).await?;
                tracing::info!(
                    connection_id = %connection.connection_id(),
                    api_id = %connection.api_id(),
                    stage = %connection.stage(),
                    "Connection registered"
                );
            }
            EventKind::Disconnect => {
                self.registry.delete(&connection).await?;
                tracing::info!(
                    connection_id = %connection.connection_id(),
                    api_id = %connection.api_id(),
                    stage = %connection.stage(),
                    "Connection removed"
                );
            }
            EventKind::Message => {
                let message = Message::new(connection, format_reply(event.body.as_deref()));
                self.sender.send(&message).await?;
            }
        }

        Ok(())
    }
}
