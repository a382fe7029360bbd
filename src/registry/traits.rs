//! Connection registry trait definition

use async_trait::async_trait;
use thiserror::Error;

use crate::connection::Connection;

/// Errors that can occur during registry operations
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// The DynamoDB table rejected or failed the request
    #[error("DynamoDB error: {0}")]
    DynamoDb(String),

    /// The registry cannot be used as configured
    #[error("Registry misconfigured: {0}")]
    Misconfigured(String),
}

/// Backend type for the connection registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryBackend {
    /// Process-local map, for development and tests
    Memory,
    /// DynamoDB table
    DynamoDb,
}

impl RegistryBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::DynamoDb => "dynamodb",
        }
    }
}

/// Durable record of live connections.
///
/// Both operations are idempotent: saving the same identity twice overwrites
/// a single record, and deleting an absent identity succeeds.
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Get the backend type
    fn backend_type(&self) -> RegistryBackend;

    /// Record a connection, replacing any record with the same identity
    async fn save(&self, connection: &Connection) -> Result<(), RegistryError>;

    /// Ensure no record exists for the connection's identity
    async fn delete(&self, connection: &Connection) -> Result<(), RegistryError>;
}
