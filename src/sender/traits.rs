//! Outbound sender trait definition

use async_trait::async_trait;
use thiserror::Error;

use crate::connection::Message;

/// Errors raised when pushing data to a connection
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    /// The addressed connection is no longer open on the gateway
    #[error("Connection gone: {connection_id}")]
    Gone { connection_id: String },

    /// The management API rejected or failed the request
    #[error("Gateway error: {0}")]
    Gateway(String),
}

/// Pushes a message to a single gateway connection.
///
/// Failures are returned as-is: implementations neither retry nor touch the
/// connection registry.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, message: &Message) -> Result<(), SendError>;
}
